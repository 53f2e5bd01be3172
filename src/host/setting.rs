//! A clamped integer input.

/// A bounded integer that slider and text views both publish into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericSetting {
    value: i64,
    min: i64,
    max: i64,
    step: i64,
}

impl NumericSetting {
    /// Create a setting; the initial value is clamped into range.
    #[must_use]
    pub fn new(value: i64, min: i64, max: i64, step: i64) -> Self {
        let max = max.max(min);
        Self {
            value: value.clamp(min, max),
            min,
            max,
            step: step.max(1),
        }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Publish a raw value. Returns true if the stored value changed.
    pub fn publish(&mut self, raw: i64) -> bool {
        let clamped = raw.clamp(self.min, self.max);
        let changed = clamped != self.value;
        self.value = clamped;
        changed
    }

    /// Publish typed text. Text that is not an integer is ignored.
    pub fn publish_text(&mut self, text: &str) -> bool {
        text.trim()
            .parse::<i64>()
            .is_ok_and(|raw| self.publish(raw))
    }

    /// Slider increment.
    pub fn step_up(&mut self) -> bool {
        self.publish(self.value.saturating_add(self.step))
    }

    /// Slider decrement.
    pub fn step_down(&mut self) -> bool {
        self.publish(self.value.saturating_sub(self.step))
    }

    /// Slider knob position in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn slider_fraction(&self) -> f64 {
        if self.max == self.min {
            return 1.0;
        }
        (self.value - self.min) as f64 / (self.max - self.min) as f64
    }

    /// Text-box view.
    #[must_use]
    pub fn text(&self) -> String {
        self.value.to_string()
    }

    /// Label view, e.g. `"30 min"`.
    #[must_use]
    pub fn label(&self, unit: &str) -> String {
        format!("{} {unit}", self.value)
    }
}
