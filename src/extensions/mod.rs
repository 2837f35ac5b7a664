//! Optional observer hooks live here.
//!
//! Plugins never take part in the lifecycle ordering; they only observe it.

pub mod plugins;

pub use plugins::{ChartPlugin, PluginContext, PluginEvent};
