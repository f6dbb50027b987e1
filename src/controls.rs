//! Controls for user interaction with the chart.
use std::time::Duration;

/// Configures how pointer gestures on the chart are interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartControls {
    /// "Quick edit": pressing on a marker and dragging it rewrites the task.
    pub quick_edit: bool,

    /// Clicking a marker selects the task for inline editing.
    pub click_to_select: bool,

    /// Double-clicking a marker opens the icon editor.
    pub double_click_to_activate: bool,

    /// Maximum time between two clicks of a double click.
    pub double_click_window: Duration,

    /// Pointer travel (pixels) after which a press becomes a drag instead of a click.
    pub click_slop_px: f64,
}

impl Default for ChartControls {
    fn default() -> Self {
        Self {
            quick_edit: false,
            click_to_select: true,
            double_click_to_activate: true,
            double_click_window: Duration::from_millis(350),
            click_slop_px: 4.0,
        }
    }
}

impl ChartControls {
    pub fn with_quick_edit(mut self, enabled: bool) -> Self {
        self.quick_edit = enabled;
        self
    }
}
