//! Host bindings between the control panel inputs and the session controller.
//!
//! Each setting has a single normalized value. The slider and the text entry
//! both publish into it and both render from it; they never update each
//! other directly.

mod setting;

pub use setting::NumericSetting;

use serde::Serialize;

use crate::config::SessionSettings;
use crate::session::config::{MAX_BREAK_SECONDS, MIN_BREAK_SECONDS, MIN_FOCUS_MINUTES};
use crate::session::{SessionConfig, SessionController};

/// Slider step for focus minutes.
const FOCUS_STEP: i64 = 1;

/// Slider step for break seconds.
const BREAK_STEP: i64 = 10;

/// Which input currently has focus on the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    FocusMinutes,
    BreakSeconds,
}

impl Field {
    /// The other field.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::FocusMinutes => Self::BreakSeconds,
            Self::BreakSeconds => Self::FocusMinutes,
        }
    }
}

/// The control panel's configuration inputs.
#[derive(Debug, Clone)]
pub struct HostBindings {
    pub focus_minutes: NumericSetting,
    pub break_seconds: NumericSetting,
}

impl HostBindings {
    /// Build the inputs from loaded settings.
    #[must_use]
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            focus_minutes: NumericSetting::new(
                i64::from(settings.focus_minutes),
                i64::from(MIN_FOCUS_MINUTES),
                i64::from(settings.max_focus_minutes.max(MIN_FOCUS_MINUTES)),
                FOCUS_STEP,
            ),
            break_seconds: NumericSetting::new(
                i64::from(settings.break_seconds),
                i64::from(MIN_BREAK_SECONDS),
                i64::from(MAX_BREAK_SECONDS),
                BREAK_STEP,
            ),
        }
    }

    /// The setting behind a field.
    pub fn setting_mut(&mut self, field: Field) -> &mut NumericSetting {
        match field {
            Field::FocusMinutes => &mut self.focus_minutes,
            Field::BreakSeconds => &mut self.break_seconds,
        }
    }

    /// The setting behind a field.
    #[must_use]
    pub const fn setting(&self, field: Field) -> &NumericSetting {
        match field {
            Field::FocusMinutes => &self.focus_minutes,
            Field::BreakSeconds => &self.break_seconds,
        }
    }

    /// Session configuration from the current values.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let minutes = u32::try_from(self.focus_minutes.value()).unwrap_or(MIN_FOCUS_MINUTES);
        SessionConfig::from_inputs(minutes, self.break_seconds.value())
    }

    /// Push the current values into the controller.
    pub fn apply(&self, controller: &mut SessionController) {
        controller.configure(self.session_config());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;
    use chrono::Duration;
    use std::time::Instant;

    fn settings() -> SessionSettings {
        SessionSettings {
            focus_minutes: 30,
            break_seconds: 300,
            max_focus_minutes: 180,
        }
    }

    #[test]
    fn test_bindings_from_settings() {
        let bindings = HostBindings::new(&settings());
        assert_eq!(bindings.focus_minutes.value(), 30);
        assert_eq!(bindings.break_seconds.value(), 300);
        assert_eq!(bindings.session_config(), SessionConfig::default());
    }

    #[test]
    fn test_slider_and_text_share_value() {
        let mut bindings = HostBindings::new(&settings());
        let setting = bindings.setting_mut(Field::BreakSeconds);

        setting.step_up();
        assert_eq!(setting.value(), 310);
        assert_eq!(setting.text(), "310");

        setting.publish_text("5");
        assert_eq!(setting.value(), 10);
        assert_eq!(setting.label("sec"), "10 sec");

        setting.publish_text("9999");
        assert_eq!(setting.value(), 600);
    }

    #[test]
    fn test_apply_configures_controller() {
        let mut bindings = HostBindings::new(&settings());
        let mut controller = SessionController::new(SessionConfig::default(), 80);

        bindings.setting_mut(Field::FocusMinutes).publish(45);
        bindings.apply(&mut controller);
        assert_eq!(controller.remaining(), Duration::minutes(45));

        controller.start(Instant::now());
        assert_eq!(controller.phase(), Phase::Running);
    }

    #[test]
    fn test_field_toggle() {
        assert_eq!(Field::FocusMinutes.toggle(), Field::BreakSeconds);
        assert_eq!(Field::BreakSeconds.toggle(), Field::FocusMinutes);
    }
}
