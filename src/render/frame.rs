use crate::core::Size;
use crate::error::ChartResult;
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// One draw command in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect(RectPrimitive),
    Line(LinePrimitive),
    Text(TextPrimitive),
}

/// Backend-agnostic, flattened scene for one chart draw pass.
///
/// Commands are stored back-to-front, so a backend can paint them in order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub size: Size,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.size.validate()?;
        for command in &self.commands {
            match command {
                DrawCommand::Rect(rect) => rect.validate()?,
                DrawCommand::Line(line) => line.validate()?,
                DrawCommand::Text(text) => text.validate()?,
            }
        }
        Ok(())
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }
}
