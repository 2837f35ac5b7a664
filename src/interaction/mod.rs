//! Pointer interaction: hover/pick state machine and tooltip control.

mod pick;
mod tooltip;

use serde::{Deserialize, Serialize};

pub use pick::{Pick, PickCommand, PickCommands, PickState, PointerInput, transition};
pub use tooltip::{
    DEFAULT_TOOLTIP_CLASS, Tooltip, TooltipOffset, VISIBLE_TOOLTIP_CLASS, tooltip_position,
};

/// Pointer position delivered by the host input surface.
///
/// `x`/`y` are relative to the chart surface and drive hit testing;
/// `page_x`/`page_y` are document coordinates used to place the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl PointerEvent {
    /// Event for a surface placed at the document origin.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            page_x: x,
            page_y: y,
        }
    }

    #[must_use]
    pub const fn with_page(mut self, page_x: f64, page_y: f64) -> Self {
        self.page_x = page_x;
        self.page_y = page_y;
        self
    }
}
