use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, TextHAlign};
use crate::scene::{
    NodeId, NodeKind, RectShape, Scene, TEXT_LINE_HEIGHT_FACTOR, TextShape, estimate_text_width,
};

use super::LegendDatum;

/// Chart edge the legend is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    Top,
    #[default]
    Right,
    Bottom,
    Left,
}

impl LegendPosition {
    /// Top/bottom legends flow items in rows across the chart width.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub position: LegendPosition,
    /// Gap between the legend and the chart edge it is pinned to.
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    /// Gap between an item's marker and its label.
    #[serde(default = "default_marker_padding")]
    pub marker_padding: f64,
    #[serde(default = "default_item_padding_x")]
    pub item_padding_x: f64,
    #[serde(default = "default_item_padding_y")]
    pub item_padding_y: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_label_color")]
    pub label_color: Color,
    #[serde(default = "default_disabled_color")]
    pub disabled_color: Color,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            position: LegendPosition::default(),
            padding: default_padding(),
            marker_size: default_marker_size(),
            marker_padding: default_marker_padding(),
            item_padding_x: default_item_padding_x(),
            item_padding_y: default_item_padding_y(),
            font_size: default_font_size(),
            label_color: default_label_color(),
            disabled_color: default_disabled_color(),
        }
    }
}

impl LegendConfig {
    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("padding", self.padding),
            ("marker_size", self.marker_size),
            ("marker_padding", self.marker_padding),
            ("item_padding_x", self.item_padding_x),
            ("item_padding_y", self.item_padding_y),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "legend `{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ChartError::InvalidData(
                "legend font size must be finite and > 0".to_owned(),
            ));
        }
        self.label_color.validate()?;
        self.disabled_color.validate()
    }
}

fn default_enabled() -> bool {
    true
}

fn default_padding() -> f64 {
    20.0
}

fn default_marker_size() -> f64 {
    14.0
}

fn default_marker_padding() -> f64 {
    8.0
}

fn default_item_padding_x() -> f64 {
    16.0
}

fn default_item_padding_y() -> f64 {
    8.0
}

fn default_font_size() -> f64 {
    12.0
}

fn default_label_color() -> Color {
    Color::BLACK
}

fn default_disabled_color() -> Color {
    Color::rgb(0.75, 0.75, 0.75)
}

/// Legend sub-tree: one item group (marker + label) per entry.
///
/// Each item keeps the datum it was built from, so hit testing keeps matching
/// what is on screen after `data` is replaced and before the next layout.
#[derive(Debug, Clone)]
pub struct Legend {
    config: LegendConfig,
    data: Vec<LegendDatum>,
    group: NodeId,
    items: Vec<(NodeId, LegendDatum)>,
}

impl Legend {
    pub(crate) fn new(scene: &mut Scene, config: LegendConfig) -> Self {
        let group = scene.create(NodeKind::Group);
        Self {
            config,
            data: Vec::new(),
            group,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn group(&self) -> NodeId {
        self.group
    }

    #[must_use]
    pub fn config(&self) -> LegendConfig {
        self.config
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    #[must_use]
    pub fn position(&self) -> LegendPosition {
        self.config.position
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.config.padding
    }

    #[must_use]
    pub fn data(&self) -> &[LegendDatum] {
        &self.data
    }

    pub(crate) fn set_config(&mut self, config: LegendConfig) {
        self.config = config;
    }

    pub(crate) fn set_data(&mut self, data: Vec<LegendDatum>) {
        self.data = data;
    }

    /// Rebuilds item nodes, flowing them within the offered extent.
    ///
    /// Horizontal legends wrap rows at `max_width`, vertical legends wrap
    /// columns at `max_height`. A non-positive limit means unbounded.
    pub fn perform_layout(
        &mut self,
        scene: &mut Scene,
        max_width: f64,
        max_height: f64,
    ) -> ChartResult<()> {
        scene.clear_children(self.group);
        self.items.clear();

        let config = self.config;
        let label_height = config.font_size * TEXT_LINE_HEIGHT_FACTOR;
        let item_height = config.marker_size.max(label_height);
        let horizontal = config.position.is_horizontal();

        let mut x = 0.0_f64;
        let mut y = 0.0_f64;
        let mut line_extent = 0.0_f64;

        for datum in &self.data {
            let item_width = config.marker_size
                + config.marker_padding
                + estimate_text_width(&datum.label, config.font_size);

            if horizontal {
                if x > 0.0 && max_width > 0.0 && x + item_width > max_width {
                    x = 0.0;
                    y += line_extent + config.item_padding_y;
                    line_extent = 0.0;
                }
            } else if y > 0.0 && max_height > 0.0 && y + item_height > max_height {
                y = 0.0;
                x += line_extent + config.item_padding_x;
                line_extent = 0.0;
            }

            let item = self.build_item(scene, datum, item_height, label_height)?;
            scene.set_translation(item, x, y)?;
            scene.append_child(self.group, item)?;
            self.items.push((item, datum.clone()));

            if horizontal {
                x += item_width + config.item_padding_x;
                line_extent = line_extent.max(item_height);
            } else {
                y += item_height + config.item_padding_y;
                line_extent = line_extent.max(item_width);
            }
        }
        Ok(())
    }

    fn build_item(
        &self,
        scene: &mut Scene,
        datum: &LegendDatum,
        item_height: f64,
        label_height: f64,
    ) -> ChartResult<NodeId> {
        let config = self.config;
        let item = scene.create(NodeKind::Group);

        let (fill, stroke, label_color) = if datum.enabled {
            (datum.marker.fill, datum.marker.stroke, config.label_color)
        } else {
            (
                config.disabled_color,
                config.disabled_color,
                config.disabled_color,
            )
        };

        let mut marker = RectShape::new(
            0.0,
            (item_height - config.marker_size) / 2.0,
            config.marker_size,
            config.marker_size,
            fill,
        );
        marker.stroke = stroke;
        marker.stroke_width = 1.0;
        let marker = scene.create(NodeKind::Rect(marker));

        let mut label = TextShape::new(
            datum.label.clone(),
            config.font_size,
            label_color,
            TextHAlign::Left,
        );
        label.x = config.marker_size + config.marker_padding;
        label.y = (item_height - label_height) / 2.0;
        let label = scene.create(NodeKind::Text(label));

        scene.append_child(item, marker)?;
        scene.append_child(item, label)?;
        Ok(item)
    }

    /// Maps a surface point to the legend entry drawn under it.
    #[must_use]
    pub fn datum_for_point(&self, scene: &Scene, x: f64, y: f64) -> Option<&LegendDatum> {
        if !self.config.enabled || !scene.is_visible(self.group) {
            return None;
        }
        self.items
            .iter()
            .find(|(item, _)| {
                scene
                    .world_bbox(*item)
                    .is_some_and(|bbox| bbox.contains_point(x, y))
            })
            .map(|(_, datum)| datum)
    }
}
