//! Visual surfaces driven by the session controller.

pub mod overlay;
pub mod widget;

pub use overlay::{BreakOverlay, OverlayEvent, OverlayViewModel};
pub use widget::{bars_for_fraction, FloatingWidget, Placement, WidgetViewModel, TOTAL_BARS};
