use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::BBox;
use crate::error::ChartResult;
use crate::render::Color;
use crate::scene::{NodeId, Scene};

/// Stable series identifier. Unique within one chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(String);

impl SeriesId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Process-unique chart identity used for series back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartId(u64);

impl ChartId {
    #[must_use]
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Non-owning link from an attached series back to its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesBinding {
    pub chart: ChartId,
    /// Root of the series sub-tree inside the chart scene.
    pub group: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendMarker {
    pub fill: Color,
    pub stroke: Color,
}

impl Default for LegendMarker {
    fn default() -> Self {
        Self {
            fill: Color::rgb(0.4, 0.4, 0.4),
            stroke: Color::rgb(0.2, 0.2, 0.2),
        }
    }
}

/// One legend entry reported by a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendDatum {
    /// Owning series.
    pub id: SeriesId,
    /// Series-local item key (for example a y-key or a pie sector).
    pub item_id: String,
    pub enabled: bool,
    pub label: String,
    #[serde(default)]
    pub marker: LegendMarker,
}

impl LegendDatum {
    #[must_use]
    pub fn new(
        id: SeriesId,
        item_id: impl Into<String>,
        label: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            id,
            item_id: item_id.into(),
            enabled,
            label: label.into(),
            marker: LegendMarker::default(),
        }
    }

    #[must_use]
    pub fn with_marker(mut self, marker: LegendMarker) -> Self {
        self.marker = marker;
        self
    }
}

/// State every series carries regardless of its concrete rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBase {
    id: SeriesId,
    pub visible: bool,
    pub show_in_legend: bool,
    pub tooltip_enabled: bool,
    binding: Option<SeriesBinding>,
}

impl SeriesBase {
    #[must_use]
    pub fn new(id: SeriesId) -> Self {
        Self {
            id,
            visible: true,
            show_in_legend: true,
            tooltip_enabled: true,
            binding: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Owning chart, `None` while detached.
    #[must_use]
    pub fn chart(&self) -> Option<ChartId> {
        self.binding.map(|binding| binding.chart)
    }

    /// Root of the owned scene sub-tree, `None` while detached.
    #[must_use]
    pub fn group(&self) -> Option<NodeId> {
        self.binding.map(|binding| binding.group)
    }

    pub(crate) fn bind(&mut self, binding: SeriesBinding) {
        self.binding = Some(binding);
    }

    pub(crate) fn unbind(&mut self) {
        self.binding = None;
    }
}

/// Contract between the chart coordinator and a concrete series renderer.
///
/// The chart owns the scene; a series mutates only the sub-tree rooted at its
/// group. Failing `process_data`/`update` calls abort the whole pass.
pub trait Series {
    fn base(&self) -> &SeriesBase;
    fn base_mut(&mut self) -> &mut SeriesBase;

    fn id(&self) -> &SeriesId {
        self.base().id()
    }

    fn is_visible(&self) -> bool {
        self.base().visible
    }

    fn show_in_legend(&self) -> bool {
        self.base().show_in_legend
    }

    fn tooltip_enabled(&self) -> bool {
        self.base().tooltip_enabled
    }

    /// Receives the chart-level records.
    fn set_data(&mut self, data: &[Value]);

    /// Derives drawable data from the raw records.
    fn process_data(&mut self) -> ChartResult<()>;

    /// Lays out geometry of the owned sub-tree into `series_rect`.
    fn update(&mut self, scene: &mut Scene, series_rect: BBox) -> ChartResult<()>;

    /// Appends this series' legend entries to `out`.
    fn list_series_items(&self, out: &mut Vec<LegendDatum>);

    fn highlight_node(&mut self, scene: &mut Scene, node: NodeId);

    fn dehighlight_node(&mut self, scene: &mut Scene);

    /// Tooltip markup for a picked node. `None` or an empty string means no tooltip.
    fn tooltip_html(&self, scene: &Scene, node: NodeId) -> Option<String>;

    fn toggle_series_item(&mut self, item_id: &str, enabled: bool);
}
