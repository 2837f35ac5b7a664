use serde::{Deserialize, Serialize};

use crate::core::{BBox, LegendDatum, Padding, SeriesId, Size};
use crate::error::{ChartError, ChartResult};
use crate::interaction::Pick;
use crate::render::Renderer;

use super::{Chart, HostScheduler, LifecycleStats};

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub size: Size,
    pub padding: Padding,
    pub data_pending: bool,
    pub layout_pending: bool,
    pub redraw_pending: bool,
    pub caption_auto_padding: f64,
    pub legend_auto_padding: Padding,
    pub series_rect: BBox,
    pub series_ids: Vec<SeriesId>,
    pub legend_data: Vec<LegendDatum>,
    pub pick: Option<Pick>,
    pub tooltip_visible: bool,
    pub stats: LifecycleStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts both a bare snapshot and the versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            size: self.scene.size(),
            padding: self.padding,
            data_pending: self.is_data_pending(),
            layout_pending: self.is_layout_pending(),
            redraw_pending: self.is_redraw_pending(),
            caption_auto_padding: self.layout.caption_auto_padding,
            legend_auto_padding: self.layout.legend_auto_padding,
            series_rect: self.layout.series_rect,
            series_ids: self.series_ids(),
            legend_data: self.legend.data().to_vec(),
            pick: self.pick.current().cloned(),
            tooltip_visible: self.tooltip.is_visible(),
            stats: self.stats,
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
