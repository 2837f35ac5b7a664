//! Public chart facade: lifecycle scheduling, layout, series registry and
//! pointer handling, split across coordinator files that all extend [`Chart`].

mod chart;
mod chart_config;
mod chart_setters;
mod layout_coordinator;
mod lifecycle;
mod plugin_registry;
mod pointer_coordinator;
mod scheduler;
mod series_registry;
mod snapshot;

pub use chart::Chart;
pub use chart_config::ChartConfig;
pub use lifecycle::LifecycleStats;
pub use scheduler::{HostScheduler, ManualScheduler, PendingSlot, TaskHandle, TaskQueue};
pub use snapshot::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1};
