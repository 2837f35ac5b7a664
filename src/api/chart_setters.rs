use serde_json::Value;
use tracing::{debug, trace};

use crate::core::{Caption, LegendConfig, LegendPosition, Padding, Size};
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipOffset;
use crate::render::Renderer;
use crate::scene::{NodeId, NodeKind, Scene};

use super::chart::CaptionSlot;
use super::chart_config::validate_tooltip_offset;
use super::{Chart, HostScheduler};

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    pub fn set_size(&mut self, size: Size) -> ChartResult<()> {
        size.validate()?;
        if self.scene.size() == size {
            return Ok(());
        }
        trace!(width = size.width, height = size.height, "chart resized");
        self.scene.set_size(size);
        self.set_layout_pending(true);
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) -> ChartResult<()> {
        self.set_size(Size::new(width, self.height()))
    }

    pub fn set_height(&mut self, height: f64) -> ChartResult<()> {
        self.set_size(Size::new(self.width(), height))
    }

    pub fn set_padding(&mut self, padding: Padding) -> ChartResult<()> {
        padding.validate()?;
        if self.padding == padding {
            return Ok(());
        }
        self.padding = padding;
        self.set_layout_pending(true);
        Ok(())
    }

    /// Replaces the chart-level records, forwards them to every series and
    /// marks data dirty.
    pub fn set_data(&mut self, data: Vec<Value>) {
        debug!(chart = self.id.raw(), records = data.len(), "chart data replaced");
        self.data = data;
        for series in self.series.values_mut() {
            series.set_data(&self.data);
        }
        self.set_data_pending(true);
    }

    #[must_use]
    pub fn title(&self) -> Option<&Caption> {
        self.title.as_ref().map(|slot| &slot.caption)
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<&Caption> {
        self.subtitle.as_ref().map(|slot| &slot.caption)
    }

    #[must_use]
    pub fn title_node(&self) -> Option<NodeId> {
        self.title.as_ref().map(|slot| slot.node)
    }

    #[must_use]
    pub fn subtitle_node(&self) -> Option<NodeId> {
        self.subtitle.as_ref().map(|slot| slot.node)
    }

    /// Swaps the title caption, replacing its scene node, and requests layout.
    pub fn set_title(&mut self, title: Option<Caption>) -> ChartResult<()> {
        if let Some(caption) = &title {
            caption.validate()?;
        }
        if replace_caption(&mut self.scene, &mut self.title, title)? {
            self.set_layout_pending(true);
        }
        Ok(())
    }

    pub fn set_subtitle(&mut self, subtitle: Option<Caption>) -> ChartResult<()> {
        if let Some(caption) = &subtitle {
            caption.validate()?;
        }
        if replace_caption(&mut self.scene, &mut self.subtitle, subtitle)? {
            self.set_layout_pending(true);
        }
        Ok(())
    }

    /// Edits the title in place. Returns `Ok(false)` when there is no title.
    pub fn update_title(&mut self, update: impl FnOnce(&mut Caption)) -> ChartResult<bool> {
        let changed = update_caption(&mut self.scene, self.title.as_mut(), update)?;
        if changed {
            self.set_layout_pending(true);
        }
        Ok(self.title.is_some())
    }

    pub fn update_subtitle(&mut self, update: impl FnOnce(&mut Caption)) -> ChartResult<bool> {
        let changed = update_caption(&mut self.scene, self.subtitle.as_mut(), update)?;
        if changed {
            self.set_layout_pending(true);
        }
        Ok(self.subtitle.is_some())
    }

    pub fn set_legend_enabled(&mut self, enabled: bool) {
        let mut config = self.legend.config();
        config.enabled = enabled;
        self.apply_legend_config(config);
    }

    /// Moves the legend to another edge; auto padding of the old edge is dropped.
    pub fn set_legend_position(&mut self, position: LegendPosition) {
        let mut config = self.legend.config();
        config.position = position;
        self.apply_legend_config(config);
    }

    pub fn set_legend_padding(&mut self, padding: f64) -> ChartResult<()> {
        let mut config = self.legend.config();
        config.padding = padding;
        self.update_legend_config(config)
    }

    pub fn update_legend_config(&mut self, config: LegendConfig) -> ChartResult<()> {
        config.validate()?;
        self.apply_legend_config(config);
        Ok(())
    }

    fn apply_legend_config(&mut self, config: LegendConfig) {
        let previous = self.legend.config();
        if previous == config {
            return;
        }
        if previous.position != config.position {
            self.layout.legend_auto_padding.clear();
        }
        self.legend.set_config(config);
        self.set_layout_pending(true);
    }

    #[must_use]
    pub fn tooltip_class(&self) -> &str {
        self.tooltip.user_class()
    }

    /// Sets the user tooltip class; the class attribute is rebuilt as a whole.
    pub fn set_tooltip_class(&mut self, class: impl Into<String>) {
        self.tooltip.set_user_class(class);
    }

    pub fn set_tooltip_offset(&mut self, offset: TooltipOffset) -> ChartResult<()> {
        validate_tooltip_offset(offset)?;
        self.tooltip.set_offset(offset);
        Ok(())
    }
}

/// Diffs the caption slot against `next`, swapping the scene node when the
/// caption changes. Returns `true` on change.
fn replace_caption(
    scene: &mut Scene,
    slot: &mut Option<CaptionSlot>,
    next: Option<Caption>,
) -> ChartResult<bool> {
    if slot.as_ref().map(|current| &current.caption) == next.as_ref() {
        return Ok(false);
    }
    if let Some(previous) = slot.take() {
        scene.destroy(previous.node);
    }
    if let Some(caption) = next {
        let node = scene.create(NodeKind::Text(caption.to_shape()));
        if let Some(node) = scene.node_mut(node) {
            node.pickable = false;
        }
        let root = scene.root();
        scene.append_child(root, node)?;
        *slot = Some(CaptionSlot { caption, node });
    }
    Ok(true)
}

fn update_caption(
    scene: &mut Scene,
    slot: Option<&mut CaptionSlot>,
    update: impl FnOnce(&mut Caption),
) -> ChartResult<bool> {
    let Some(slot) = slot else {
        return Ok(false);
    };
    let mut caption = slot.caption.clone();
    update(&mut caption);
    caption.validate()?;
    if caption == slot.caption {
        return Ok(false);
    }

    let node = scene
        .node_mut(slot.node)
        .ok_or(ChartError::UnknownNode {
            index: slot.node.index(),
        })?;
    if let NodeKind::Text(text) = &mut node.kind {
        let shape = caption.to_shape();
        text.text = shape.text;
        text.font_size = shape.font_size;
        text.color = shape.color;
    }
    slot.caption = caption;
    Ok(true)
}
