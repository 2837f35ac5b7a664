use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Size;
use crate::render::OverlaySurface;

use super::PointerEvent;

pub const DEFAULT_TOOLTIP_CLASS: &str = "chart-tooltip";
pub const VISIBLE_TOOLTIP_CLASS: &str = "visible";

/// Distance between the pointer and the tooltip's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipOffset {
    pub x: f64,
    pub y: f64,
}

impl Default for TooltipOffset {
    fn default() -> Self {
        Self { x: 20.0, y: 20.0 }
    }
}

/// Places the tooltip at `pointer + offset`, flipping it to the left of the
/// pointer when it would overflow the container's right edge.
#[must_use]
pub fn tooltip_position(
    pointer: PointerEvent,
    tooltip_size: Size,
    container_width: Option<f64>,
    scroll_x: f64,
    offset: TooltipOffset,
) -> (f64, f64) {
    let top = pointer.page_y + offset.y;
    let mut left = pointer.page_x + offset.x;
    if let Some(container_width) = container_width {
        if left - scroll_x + tooltip_size.width > container_width {
            left -= tooltip_size.width + offset.x;
        }
    }
    (left, top)
}

/// Tooltip controller on top of an injected overlay surface.
///
/// The class attribute is always rewritten as a whole from the default class,
/// the user class and the visibility marker.
pub struct Tooltip {
    surface: Box<dyn OverlaySurface>,
    user_class: String,
    visible: bool,
    offset: TooltipOffset,
}

impl fmt::Debug for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tooltip")
            .field("user_class", &self.user_class)
            .field("visible", &self.visible)
            .field("offset", &self.offset)
            .field("attached", &self.surface.is_attached())
            .finish()
    }
}

impl Tooltip {
    #[must_use]
    pub fn new(
        mut surface: Box<dyn OverlaySurface>,
        user_class: impl Into<String>,
        offset: TooltipOffset,
    ) -> Self {
        surface.attach();
        let mut tooltip = Self {
            surface,
            user_class: user_class.into(),
            visible: false,
            offset,
        };
        tooltip.apply_class_list();
        tooltip
    }

    #[must_use]
    pub fn class_list(&self) -> Vec<&str> {
        let mut classes = vec![DEFAULT_TOOLTIP_CLASS];
        if !self.user_class.is_empty() {
            classes.push(&self.user_class);
        }
        if self.visible {
            classes.push(VISIBLE_TOOLTIP_CLASS);
        }
        classes
    }

    fn apply_class_list(&mut self) {
        let classes = self.class_list().join(" ");
        self.surface.set_class_attribute(&classes);
    }

    #[must_use]
    pub fn user_class(&self) -> &str {
        &self.user_class
    }

    /// Returns `true` when the class changed.
    pub fn set_user_class(&mut self, user_class: impl Into<String>) -> bool {
        let user_class = user_class.into();
        if self.user_class == user_class {
            return false;
        }
        self.user_class = user_class;
        self.apply_class_list();
        true
    }

    #[must_use]
    pub fn offset(&self) -> TooltipOffset {
        self.offset
    }

    pub fn set_offset(&mut self, offset: TooltipOffset) {
        self.offset = offset;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.surface.is_attached()
    }

    /// Shows the tooltip at the pointer.
    ///
    /// With `html` the content is replaced first; without it the existing
    /// content is only repositioned, and nothing happens when there is none.
    pub fn show(&mut self, pointer: PointerEvent, html: Option<&str>) {
        match html {
            Some(html) => self.surface.set_html(html),
            None if self.surface.html().is_empty() => return,
            None => {}
        }

        if html.is_some_and(|html| !html.is_empty()) && !self.visible {
            self.visible = true;
            self.apply_class_list();
        }

        let (left, top) = tooltip_position(
            pointer,
            self.surface.measure(),
            self.surface.container_width(),
            self.surface.scroll_x(),
            self.offset,
        );
        self.surface.set_position(left, top);
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.apply_class_list();
    }

    /// Detaches the surface; safe to call repeatedly.
    pub fn detach(&mut self) {
        if self.surface.is_attached() {
            self.surface.detach();
        }
    }
}
