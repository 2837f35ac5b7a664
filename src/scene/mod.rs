//! Retained-mode scene graph adapter.
//!
//! Nodes live in a generational arena owned by [`Scene`]. Series, the legend and
//! captions own sub-trees of one chart scene and address them by [`NodeId`].

mod graph;
mod node;

pub use graph::Scene;
pub use node::{
    LineShape, Node, NodeId, NodeKind, RectShape, TEXT_LINE_HEIGHT_FACTOR, TEXT_WIDTH_FACTOR,
    TextShape, estimate_text_width,
};
