use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::core::{BBox, Caption, ChartId, Legend, Padding, Series, SeriesId, Size};
use crate::error::ChartResult;
use crate::extensions::ChartPlugin;
use crate::interaction::{PickState, Tooltip};
use crate::render::{OverlaySurface, Renderer};
use crate::scene::{NodeId, NodeKind, RectShape, Scene};

use super::{ChartConfig, HostScheduler, LifecycleStats, ManualScheduler, PendingSlot, TaskQueue};

/// Caption text node owned by the chart.
#[derive(Debug, Clone)]
pub(super) struct CaptionSlot {
    pub(super) caption: Caption,
    pub(super) node: NodeId,
}

/// Pending flags of the three deferred passes.
#[derive(Debug, Clone, Copy)]
pub(super) struct LifecycleSlots {
    pub(super) data: PendingSlot,
    pub(super) layout: PendingSlot,
    pub(super) redraw: PendingSlot,
    /// A layout was cancelled or absorbed behind the pending data pass.
    pub(super) layout_deferred: bool,
}

impl Default for LifecycleSlots {
    fn default() -> Self {
        Self {
            data: PendingSlot::new(TaskQueue::Tick),
            layout: PendingSlot::new(TaskQueue::Frame),
            redraw: PendingSlot::new(TaskQueue::Frame),
            layout_deferred: false,
        }
    }
}

/// Derived geometry written by the layout pass.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LayoutState {
    pub(super) caption_auto_padding: f64,
    pub(super) legend_auto_padding: Padding,
    pub(super) series_rect: BBox,
}

/// Chart lifecycle coordinator consumed by host applications.
///
/// `Chart` owns the scene, the ordered series collection, the legend, captions
/// and the tooltip, and sequences data processing, layout and redraw through
/// the host scheduler `S`. Frames go to the renderer `R`.
pub struct Chart<R: Renderer, S: HostScheduler = ManualScheduler> {
    pub(super) id: ChartId,
    pub(super) renderer: R,
    pub(super) scheduler: S,
    pub(super) scene: Scene,
    pub(super) background: NodeId,
    pub(super) series_root: NodeId,
    pub(super) series: IndexMap<SeriesId, Box<dyn Series>>,
    pub(super) legend: Legend,
    pub(super) title: Option<CaptionSlot>,
    pub(super) subtitle: Option<CaptionSlot>,
    pub(super) padding: Padding,
    pub(super) data: Vec<Value>,
    pub(super) tooltip: Tooltip,
    pub(super) pick: PickState,
    pub(super) layout: LayoutState,
    pub(super) slots: LifecycleSlots,
    pub(super) stats: LifecycleStats,
    pub(super) plugins: Vec<Box<dyn ChartPlugin>>,
    pub(super) destroyed: bool,
}

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    /// Builds the chart scene and requests the first layout pass.
    pub fn new(
        renderer: R,
        scheduler: S,
        overlay: Box<dyn OverlaySurface>,
        config: ChartConfig,
    ) -> ChartResult<Self> {
        config.validate()?;

        let size = config.size;
        let mut scene = Scene::new(size);
        let root = scene.root();

        let background = scene.create(NodeKind::Rect(RectShape::new(
            0.0,
            0.0,
            size.width,
            size.height,
            config.background,
        )));
        if let Some(node) = scene.node_mut(background) {
            node.pickable = false;
        }
        scene.append_child(root, background)?;

        let series_root = scene.create(NodeKind::Group);
        scene.append_child(root, series_root)?;

        let legend = Legend::new(&mut scene, config.legend);
        scene.append_child(root, legend.group())?;

        let tooltip = Tooltip::new(overlay, config.tooltip_class, config.tooltip_offset);

        let mut chart = Self {
            id: ChartId::next(),
            renderer,
            scheduler,
            scene,
            background,
            series_root,
            series: IndexMap::new(),
            legend,
            title: None,
            subtitle: None,
            padding: config.padding,
            data: Vec::new(),
            tooltip,
            pick: PickState::Idle,
            layout: LayoutState::default(),
            slots: LifecycleSlots::default(),
            stats: LifecycleStats::default(),
            plugins: Vec::new(),
            destroyed: false,
        };
        debug!(
            chart = chart.id.raw(),
            width = size.width,
            height = size.height,
            "chart created"
        );
        chart.set_layout_pending(true);
        Ok(chart)
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Group holding one sub-group per series, in series order.
    #[must_use]
    pub fn series_root(&self) -> NodeId {
        self.series_root
    }

    #[must_use]
    pub fn background(&self) -> NodeId {
        self.background
    }

    #[must_use]
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    #[must_use]
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    #[must_use]
    pub fn pick_state(&self) -> &PickState {
        &self.pick
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.scene.size()
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.scene.size().width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.scene.size().height
    }

    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    #[must_use]
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Vertical space reserved by the title and subtitle.
    #[must_use]
    pub fn caption_auto_padding(&self) -> f64 {
        self.layout.caption_auto_padding
    }

    /// Space reserved on the legend's edge by the last layout pass.
    #[must_use]
    pub fn legend_auto_padding(&self) -> Padding {
        self.layout.legend_auto_padding
    }

    /// Rectangle handed to series by the last layout pass.
    #[must_use]
    pub fn series_rect(&self) -> BBox {
        self.layout.series_rect
    }

    #[must_use]
    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl<R: Renderer, S: HostScheduler> Drop for Chart<R, S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
