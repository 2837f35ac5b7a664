use serde::{Deserialize, Serialize};

use crate::core::{Padding, SeriesId, Size};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub size: Size,
    pub series_count: usize,
    pub legend_items: usize,
    pub legend_auto_padding: Padding,
    pub caption_auto_padding: f64,
    pub picked_series: Option<SeriesId>,
}

/// Lifecycle event stream exposed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    /// A data pass finished and the legend holds `legend_items` entries.
    DataProcessed { legend_items: usize },
    /// A layout pass finished. `pass` counts layout passes since construction.
    LayoutDone { pass: u64 },
    Rendered,
    NodePicked { series_id: SeriesId },
    PickCleared,
    LegendItemToggled {
        series_id: SeriesId,
        item_id: String,
        enabled: bool,
    },
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe lifecycle events and read chart context without mutating
/// coordinator internals directly.
pub trait ChartPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &PluginEvent, context: &PluginContext);
}
