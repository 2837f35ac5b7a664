use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartPlugin, PluginContext, PluginEvent};
use crate::render::Renderer;

use super::{Chart, HostScheduler};

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    /// Registers a plugin with unique identifier.
    pub fn register_plugin(&mut self, plugin: Box<dyn ChartPlugin>) -> ChartResult<()> {
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(ChartError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.has_plugin(&plugin_id) {
            return Err(ChartError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        debug!(chart = self.id.raw(), plugin = %plugin_id, "plugin registered");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Unregisters a plugin by id. Returns `true` when removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        if let Some(position) = self
            .plugins
            .iter()
            .position(|entry| entry.id() == plugin_id)
        {
            self.plugins.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.id() == plugin_id)
    }

    pub(super) fn plugin_context(&self) -> PluginContext {
        PluginContext {
            size: self.scene.size(),
            series_count: self.series.len(),
            legend_items: self.legend.data().len(),
            legend_auto_padding: self.layout.legend_auto_padding,
            caption_auto_padding: self.layout.caption_auto_padding,
            picked_series: self.pick.current().map(|pick| pick.series.clone()),
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: PluginEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(&event, &context);
        }
    }
}
