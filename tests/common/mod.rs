#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chart_lifecycle::api::{Chart, ChartConfig, ManualScheduler};
use chart_lifecycle::core::{BBox, LegendDatum, Series, SeriesBase, SeriesId, Size};
use chart_lifecycle::extensions::{ChartPlugin, PluginContext, PluginEvent};
use chart_lifecycle::render::{Color, HeadlessOverlay, NullRenderer};
use chart_lifecycle::scene::{NodeId, NodeKind, RectShape, Scene};
use chart_lifecycle::{ChartError, ChartResult};
use serde_json::{Value, json};

pub type TestChart = Chart<NullRenderer, ManualScheduler>;

/// Calls observed by a [`RecordingSeries`], shared with the test body.
#[derive(Debug, Default)]
pub struct SeriesLog {
    pub process_calls: usize,
    pub update_calls: usize,
    /// `process_calls` as seen by each `update` call.
    pub processed_before_update: Vec<usize>,
    pub last_rect: Option<BBox>,
    pub data_len: usize,
    pub highlight_calls: usize,
    pub dehighlight_calls: usize,
    pub highlighted: Option<NodeId>,
    pub tooltip_requests: usize,
    pub toggles: Vec<(String, bool)>,
}

/// Series drawing one pickable rectangle at fixed surface coordinates.
pub struct RecordingSeries {
    base: SeriesBase,
    log: Rc<RefCell<SeriesLog>>,
    items: Vec<(String, bool)>,
    geometry: BBox,
    node: Option<NodeId>,
    tooltip: Option<String>,
    fail_process: bool,
    fail_update: bool,
}

impl RecordingSeries {
    pub fn new(id: &str) -> Self {
        Self {
            base: SeriesBase::new(SeriesId::new(id)),
            log: Rc::new(RefCell::new(SeriesLog::default())),
            items: Vec::new(),
            geometry: BBox::new(0.0, 0.0, 0.0, 0.0),
            node: None,
            tooltip: None,
            fail_process: false,
            fail_update: false,
        }
    }

    pub fn with_items(mut self, items: &[&str]) -> Self {
        self.items = items.iter().map(|item| ((*item).to_owned(), true)).collect();
        self
    }

    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.geometry = BBox::new(x, y, width, height);
        self
    }

    pub fn with_tooltip(mut self, html: &str) -> Self {
        self.tooltip = Some(html.to_owned());
        self
    }

    pub fn with_tooltip_enabled(mut self, enabled: bool) -> Self {
        self.base.tooltip_enabled = enabled;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.base.visible = visible;
        self
    }

    pub fn with_show_in_legend(mut self, show: bool) -> Self {
        self.base.show_in_legend = show;
        self
    }

    pub fn failing_process(mut self) -> Self {
        self.fail_process = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn log(&self) -> Rc<RefCell<SeriesLog>> {
        self.log.clone()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn fault(&self, reason: &str) -> ChartError {
        ChartError::SeriesFault {
            series_id: self.base.id().to_string(),
            reason: reason.to_owned(),
        }
    }
}

impl Series for RecordingSeries {
    fn base(&self) -> &SeriesBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SeriesBase {
        &mut self.base
    }

    fn set_data(&mut self, data: &[Value]) {
        self.log.borrow_mut().data_len = data.len();
    }

    fn process_data(&mut self) -> ChartResult<()> {
        self.log.borrow_mut().process_calls += 1;
        if self.fail_process {
            return Err(self.fault("process failed"));
        }
        Ok(())
    }

    fn update(&mut self, scene: &mut Scene, series_rect: BBox) -> ChartResult<()> {
        {
            let mut log = self.log.borrow_mut();
            log.update_calls += 1;
            let processed = log.process_calls;
            log.processed_before_update.push(processed);
            log.last_rect = Some(series_rect);
        }
        if self.fail_update {
            return Err(self.fault("update failed"));
        }

        let Some(group) = self.base.group() else {
            return Ok(());
        };
        let node = match self.node.filter(|node| scene.contains(*node)) {
            Some(node) => node,
            None => {
                let geometry = self.geometry;
                let node = scene.create(NodeKind::Rect(RectShape::new(
                    geometry.x,
                    geometry.y,
                    geometry.width,
                    geometry.height,
                    Color::rgb(0.2, 0.4, 0.8),
                )));
                if let Some(created) = scene.node_mut(node) {
                    created.datum = Some(json!({ "series": self.base.id().as_str() }));
                }
                scene.append_child(group, node)?;
                node
            }
        };
        self.node = Some(node);
        Ok(())
    }

    fn list_series_items(&self, out: &mut Vec<LegendDatum>) {
        for (item_id, enabled) in &self.items {
            out.push(LegendDatum::new(
                self.base.id().clone(),
                item_id.clone(),
                format!("{} {item_id}", self.base.id()),
                *enabled,
            ));
        }
    }

    fn highlight_node(&mut self, _scene: &mut Scene, node: NodeId) {
        let mut log = self.log.borrow_mut();
        log.highlight_calls += 1;
        log.highlighted = Some(node);
    }

    fn dehighlight_node(&mut self, _scene: &mut Scene) {
        let mut log = self.log.borrow_mut();
        log.dehighlight_calls += 1;
        log.highlighted = None;
    }

    fn tooltip_html(&self, scene: &Scene, node: NodeId) -> Option<String> {
        self.log.borrow_mut().tooltip_requests += 1;
        scene.node(node)?.datum.as_ref()?;
        self.tooltip.clone()
    }

    fn toggle_series_item(&mut self, item_id: &str, enabled: bool) {
        self.log
            .borrow_mut()
            .toggles
            .push((item_id.to_owned(), enabled));
        if let Some(item) = self.items.iter_mut().find(|(id, _)| id == item_id) {
            item.1 = enabled;
        }
    }
}

#[derive(Clone)]
pub struct RecordingPlugin {
    id: String,
    pub events: Rc<RefCell<Vec<(PluginEvent, PluginContext)>>>,
}

impl RecordingPlugin {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ChartPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &PluginEvent, context: &PluginContext) {
        self.events.borrow_mut().push((event.clone(), context.clone()));
    }
}

pub fn build_chart_with(config: ChartConfig) -> (TestChart, HeadlessOverlay) {
    let overlay = HeadlessOverlay::new(Size::new(50.0, 30.0), Some(400.0));
    let chart = Chart::new(
        NullRenderer::default(),
        ManualScheduler::new(),
        Box::new(overlay.clone()),
        config,
    )
    .expect("chart init");
    (chart, overlay)
}

pub fn build_chart() -> (TestChart, HeadlessOverlay) {
    build_chart_with(ChartConfig::new(Size::new(400.0, 300.0)))
}

/// Drives the manual scheduler until no callback is outstanding.
pub fn settle(chart: &mut TestChart) {
    chart.run_until_idle(32).expect("lifecycle passes");
    assert!(!chart.scheduler().has_pending(), "lifecycle did not settle");
}

pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() <= 1e-9
}
