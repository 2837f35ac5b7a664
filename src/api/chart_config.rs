use serde::{Deserialize, Serialize};

use crate::core::{LegendConfig, LegendPosition, Padding, Size};
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipOffset;
use crate::render::Color;

/// Public chart bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub size: Size,
    #[serde(default = "default_padding")]
    pub padding: Padding,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default)]
    pub tooltip_offset: TooltipOffset,
    /// Extra class applied to the tooltip overlay next to the default one.
    #[serde(default)]
    pub tooltip_class: String,
    #[serde(default)]
    pub legend: LegendConfig,
}

impl ChartConfig {
    /// Creates a config with default padding, white background and a right legend.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            padding: default_padding(),
            background: default_background(),
            tooltip_offset: TooltipOffset::default(),
            tooltip_class: String::new(),
            legend: LegendConfig::default(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_tooltip_offset(mut self, x: f64, y: f64) -> Self {
        self.tooltip_offset = TooltipOffset { x, y };
        self
    }

    #[must_use]
    pub fn with_tooltip_class(mut self, class: impl Into<String>) -> Self {
        self.tooltip_class = class.into();
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendConfig) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_legend_position(mut self, position: LegendPosition) -> Self {
        self.legend.position = position;
        self
    }

    #[must_use]
    pub fn with_legend_enabled(mut self, enabled: bool) -> Self {
        self.legend.enabled = enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.size.validate()?;
        self.padding.validate()?;
        self.background.validate()?;
        validate_tooltip_offset(self.tooltip_offset)?;
        self.legend.validate()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }
}

pub(super) fn validate_tooltip_offset(offset: TooltipOffset) -> ChartResult<()> {
    if !offset.x.is_finite() || !offset.y.is_finite() {
        return Err(ChartError::InvalidData(
            "tooltip offset must be finite".to_owned(),
        ));
    }
    Ok(())
}

fn default_padding() -> Padding {
    Padding::uniform(20.0)
}

fn default_background() -> Color {
    Color::WHITE
}
