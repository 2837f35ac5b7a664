//! chart-lifecycle: retained-mode chart coordinator.
//!
//! A [`Chart`] owns a scene graph, an ordered set of series, a legend and two
//! captions. Mutations only raise pending flags; data derivation, layout and
//! redraw run later on the host's tick and frame queues, always in that order.
//! Pointer input is resolved to picked scene nodes that drive highlighting and
//! an injected tooltip overlay.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod telemetry;

pub use api::{Chart, ChartConfig, HostScheduler, ManualScheduler, TaskHandle, TaskQueue};
pub use error::{ChartError, ChartResult};
