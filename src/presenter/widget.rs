//! Floating progress widget.
//!
//! A small always-on-top box showing the remaining focus time and a row of
//! twelve bars that go dark one by one as the interval runs down. The widget
//! owns no countdown logic: it renders whatever label and fraction it is given.

use serde::Serialize;
use tracing::debug;

/// Number of bars in the progress row.
pub const TOTAL_BARS: usize = 12;

/// Widget width in terminal cells.
pub const WIDGET_WIDTH: u16 = 30;

/// Widget height in terminal cells.
pub const WIDGET_HEIGHT: u16 = 4;

/// Label shown while the session is paused.
pub const PAUSED_LABEL: &str = "Paused";

/// Label shown before the first tick arrives.
const PLACEHOLDER_LABEL: &str = "--:--";

/// Render state derived from the latest update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetViewModel {
    /// Text under the bars (`mm:ss` or the paused sentinel).
    pub remaining_label: String,
    /// Bars currently lit, `0..=TOTAL_BARS`.
    pub bars_lit: usize,
}

/// Where the widget sits on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Placement {
    /// Horizontally centered at the top edge of a display `display_width` wide.
    #[must_use]
    pub const fn top_center(display_width: u16, width: u16, height: u16) -> Self {
        Self {
            x: display_width.saturating_sub(width) / 2,
            y: 0,
            width,
            height,
        }
    }
}

/// Number of bars to light for a remaining-time fraction.
///
/// Rounds up, so a bar stays lit until its full share of time has elapsed.
/// Out-of-range and NaN fractions are clamped to `[0, 1]`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn bars_for_fraction(fraction: f64, total: usize) -> usize {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let lit = (fraction * total as f64).ceil() as usize;
    lit.min(total)
}

/// Render a bar row as text, lit bars first.
#[must_use]
pub fn render_bars(bars_lit: usize, total: usize) -> String {
    let lit = bars_lit.min(total);
    format!("{}{}", "▮".repeat(lit), "▯".repeat(total - lit))
}

/// The floating widget.
#[derive(Debug, Clone)]
pub struct FloatingWidget {
    placement: Placement,
    label: String,
    bars_lit: usize,
}

impl FloatingWidget {
    /// Create the widget at the top center of the primary display.
    ///
    /// The position is fixed for the widget's lifetime.
    #[must_use]
    pub fn create(display_width: u16) -> Self {
        let placement = Placement::top_center(display_width, WIDGET_WIDTH, WIDGET_HEIGHT);
        debug!(x = placement.x, y = placement.y, "floating widget created");
        Self {
            placement,
            label: PLACEHOLDER_LABEL.to_string(),
            bars_lit: TOTAL_BARS,
        }
    }

    /// Replace the time label.
    pub fn update_time(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Recompute the lit bars from a remaining-time fraction.
    pub fn update_progress(&mut self, fraction: f64) {
        self.bars_lit = bars_for_fraction(fraction, TOTAL_BARS);
    }

    /// Current render state.
    #[must_use]
    pub fn view_model(&self) -> WidgetViewModel {
        WidgetViewModel {
            remaining_label: self.label.clone(),
            bars_lit: self.bars_lit,
        }
    }

    /// Position chosen at creation.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Close and discard the widget.
    pub fn close(self) {
        debug!(label = %self.label, bars_lit = self.bars_lit, "floating widget closed");
    }
}
