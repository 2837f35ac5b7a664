use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::BBox;
use crate::render::{Color, TextHAlign};

/// Average glyph advance relative to font size used for text measurement.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;
/// Line box height relative to font size.
pub const TEXT_LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Generational handle of a node inside a [`Scene`](super::Scene).
///
/// Handles of destroyed nodes never resolve again, even when the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[must_use]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl RectShape {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        }
    }

    #[must_use]
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x, self.y, self.width.max(0.0), self.height.max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LineShape {
    #[must_use]
    pub fn bbox(&self) -> BBox {
        let half = self.stroke_width.max(0.0) / 2.0;
        let left = self.x1.min(self.x2) - half;
        let top = self.y1.min(self.y2) - half;
        let right = self.x1.max(self.x2) + half;
        let bottom = self.y1.max(self.y2) + half;
        BBox::new(left, top, right - left, bottom - top)
    }
}

/// Single-line text anchored horizontally by `align`; `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: Color,
    pub align: TextHAlign,
}

impl TextShape {
    #[must_use]
    pub fn new(text: impl Into<String>, font_size: f64, color: Color, align: TextHAlign) -> Self {
        Self {
            text: text.into(),
            x: 0.0,
            y: 0.0,
            font_size,
            color,
            align,
        }
    }

    #[must_use]
    pub fn bbox(&self) -> BBox {
        let width = estimate_text_width(&self.text, self.font_size);
        let height = self.font_size * TEXT_LINE_HEIGHT_FACTOR;
        let left = match self.align {
            TextHAlign::Left => self.x,
            TextHAlign::Center => self.x - width / 2.0,
            TextHAlign::Right => self.x - width,
        };
        BBox::new(left, self.y, width, height)
    }
}

/// Estimates the advance width of `text` without a font backend.
#[must_use]
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * TEXT_WIDTH_FACTOR
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Rect(RectShape),
    Line(LineShape),
    Text(TextShape),
}

impl NodeKind {
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Content bounds of a leaf in its local space. Groups have none.
    #[must_use]
    pub fn shape_bbox(&self) -> Option<BBox> {
        match self {
            Self::Group => None,
            Self::Rect(rect) => Some(rect.bbox()),
            Self::Line(line) => Some(line.bbox()),
            Self::Text(text) => Some(text.bbox()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub translation_x: f64,
    pub translation_y: f64,
    pub visible: bool,
    /// Leaves only take part in hit testing when pickable.
    pub pickable: bool,
    /// Series-provided payload for tooltips and highlighting.
    pub datum: Option<Value>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            translation_x: 0.0,
            translation_y: 0.0,
            visible: true,
            pickable: true,
            datum: None,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
