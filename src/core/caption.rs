use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, TextHAlign};
use crate::scene::TextShape;

pub const DEFAULT_TITLE_FONT_SIZE: f64 = 18.0;
pub const DEFAULT_SUBTITLE_FONT_SIZE: f64 = 14.0;

/// Title or subtitle text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub enabled: bool,
}

impl Caption {
    #[must_use]
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: DEFAULT_TITLE_FONT_SIZE,
            color: Color::rgb(0.1, 0.1, 0.1),
            enabled: true,
        }
    }

    #[must_use]
    pub fn subtitle(text: impl Into<String>) -> Self {
        Self {
            font_size: DEFAULT_SUBTITLE_FONT_SIZE,
            color: Color::rgb(0.35, 0.35, 0.35),
            ..Self::title(text)
        }
    }

    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ChartError::InvalidData(
                "caption font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }

    /// Text shape centered on its anchor; position is assigned by layout.
    #[must_use]
    pub(crate) fn to_shape(&self) -> TextShape {
        TextShape::new(
            self.text.clone(),
            self.font_size,
            self.color,
            TextHAlign::Center,
        )
    }
}
