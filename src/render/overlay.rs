use std::cell::RefCell;
use std::rc::Rc;

use crate::core::Size;

/// Out-of-band overlay element that hosts the tooltip.
///
/// The chart creates (attaches) the surface on construction and detaches it on
/// teardown. Detaching an already detached surface must be a no-op.
pub trait OverlaySurface {
    fn attach(&mut self);
    fn detach(&mut self);
    fn is_attached(&self) -> bool;

    fn set_html(&mut self, html: &str);
    fn html(&self) -> String;

    /// Replaces the whole class attribute (space separated).
    fn set_class_attribute(&mut self, classes: &str);

    /// Absolute document position of the overlay's top-left corner.
    fn set_position(&mut self, left: f64, top: f64);

    /// Rendered size of the overlay with its current content.
    fn measure(&self) -> Size;

    /// Width of the element that contains the chart, if known.
    fn container_width(&self) -> Option<f64>;

    /// Horizontal document scroll offset.
    fn scroll_x(&self) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessOverlayState {
    pub attached: bool,
    pub html: String,
    pub class_attribute: String,
    pub position: Option<(f64, f64)>,
    pub measured_size: Size,
    pub container_width: Option<f64>,
    pub scroll_x: f64,
}

/// In-memory overlay used for headless charts and tests.
///
/// Clones share state, so a host can keep a handle for inspection after the
/// surface has been moved into a chart.
#[derive(Debug, Clone)]
pub struct HeadlessOverlay {
    state: Rc<RefCell<HeadlessOverlayState>>,
}

impl HeadlessOverlay {
    #[must_use]
    pub fn new(measured_size: Size, container_width: Option<f64>) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessOverlayState {
                attached: false,
                html: String::new(),
                class_attribute: String::new(),
                position: None,
                measured_size,
                container_width,
                scroll_x: 0.0,
            })),
        }
    }

    #[must_use]
    pub fn state(&self) -> HeadlessOverlayState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.state
            .borrow()
            .class_attribute
            .split_whitespace()
            .map(str::to_owned)
            .collect()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.classes().iter().any(|class| class == "visible")
    }

    pub fn set_measured_size(&self, size: Size) {
        self.state.borrow_mut().measured_size = size;
    }

    pub fn set_container_width(&self, width: Option<f64>) {
        self.state.borrow_mut().container_width = width;
    }

    pub fn set_scroll_x(&self, scroll_x: f64) {
        self.state.borrow_mut().scroll_x = scroll_x;
    }
}

impl Default for HeadlessOverlay {
    fn default() -> Self {
        Self::new(Size::new(0.0, 0.0), None)
    }
}

impl OverlaySurface for HeadlessOverlay {
    fn attach(&mut self) {
        self.state.borrow_mut().attached = true;
    }

    fn detach(&mut self) {
        self.state.borrow_mut().attached = false;
    }

    fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    fn set_html(&mut self, html: &str) {
        html.clone_into(&mut self.state.borrow_mut().html);
    }

    fn html(&self) -> String {
        self.state.borrow().html.clone()
    }

    fn set_class_attribute(&mut self, classes: &str) {
        classes.clone_into(&mut self.state.borrow_mut().class_attribute);
    }

    fn set_position(&mut self, left: f64, top: f64) {
        self.state.borrow_mut().position = Some((left, top));
    }

    fn measure(&self) -> Size {
        self.state.borrow().measured_size
    }

    fn container_width(&self) -> Option<f64> {
        self.state.borrow().container_width
    }

    fn scroll_x(&self) -> f64 {
        self.state.borrow().scroll_x
    }
}
