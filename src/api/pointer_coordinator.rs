use tracing::{debug, trace};

use crate::core::{LegendDatum, Series};
use crate::extensions::PluginEvent;
use crate::interaction::{Pick, PickCommand, PickState, PointerEvent, PointerInput, transition};
use crate::render::Renderer;

use super::{Chart, HostScheduler};

pub(super) struct PointerCoordinator;

impl PointerCoordinator {
    /// Topmost hit first: later series paint on top, so they are tested first.
    fn pick_series_node<R: Renderer, S: HostScheduler>(
        chart: &Chart<R, S>,
        x: f64,
        y: f64,
    ) -> Option<(Pick, bool)> {
        chart.series.iter().rev().find_map(|(id, series)| {
            let group = series.base().group()?;
            let node = chart.scene.pick_node(group, x, y)?;
            Some((
                Pick {
                    series: id.clone(),
                    node,
                },
                series.tooltip_enabled(),
            ))
        })
    }

    pub(super) fn pointer_move<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
        event: PointerEvent,
    ) {
        let (hit, tooltip_enabled) = match Self::pick_series_node(chart, event.x, event.y) {
            Some((pick, tooltip_enabled)) => (Some(pick), tooltip_enabled),
            None => (None, false),
        };
        Self::apply(chart, PointerInput::Moved { hit, tooltip_enabled }, event);
    }

    pub(super) fn pointer_out<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
        event: PointerEvent,
    ) {
        Self::apply(chart, PointerInput::Left, event);
    }

    fn apply<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
        input: PointerInput,
        event: PointerEvent,
    ) {
        let (next, commands) = transition(&chart.pick, input);
        let pick_changed = next != chart.pick;
        chart.pick = next;

        for command in commands {
            Self::execute(chart, command, event);
        }

        if pick_changed {
            let event = match chart.pick.current() {
                Some(pick) => PluginEvent::NodePicked {
                    series_id: pick.series.clone(),
                },
                None => PluginEvent::PickCleared,
            };
            chart.emit_plugin_event(event);
        }
    }

    fn execute<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
        command: PickCommand,
        event: PointerEvent,
    ) {
        match command {
            PickCommand::Highlight(pick) => {
                if let Some(series) = chart.series.get_mut(&pick.series) {
                    trace!(series = %pick.series, node = pick.node.index(), "highlight");
                    series.highlight_node(&mut chart.scene, pick.node);
                    chart.request_redraw();
                }
            }
            PickCommand::Dehighlight(series_id) => {
                if let Some(series) = chart.series.get_mut(&series_id) {
                    trace!(series = %series_id, "dehighlight");
                    series.dehighlight_node(&mut chart.scene);
                    chart.request_redraw();
                }
            }
            PickCommand::ShowTooltip(pick) => {
                let html = chart
                    .series
                    .get(&pick.series)
                    .filter(|series| series.tooltip_enabled())
                    .and_then(|series| series.tooltip_html(&chart.scene, pick.node))
                    .filter(|html| !html.is_empty());
                match html {
                    Some(html) => chart.tooltip.show(event, Some(&html)),
                    // A declining series must not leave the previous node's tooltip up.
                    None => chart.tooltip.hide(),
                }
            }
            PickCommand::MoveTooltip => chart.tooltip.show(event, None),
            PickCommand::HideTooltip => chart.tooltip.hide(),
        }
    }

    /// Drops the current pick, dehighlighting its series and hiding the
    /// tooltip. `detached` is the picked series when it has already been
    /// taken out of the registry.
    pub(super) fn release_pick<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
        detached: Option<&mut dyn Series>,
    ) {
        let PickState::Hovering(pick) = std::mem::take(&mut chart.pick) else {
            return;
        };
        trace!(series = %pick.series, "pick released");
        match detached {
            Some(series) => series.dehighlight_node(&mut chart.scene),
            None => {
                if let Some(series) = chart.series.get_mut(&pick.series) {
                    series.dehighlight_node(&mut chart.scene);
                }
            }
        }
        chart.tooltip.hide();
        chart.emit_plugin_event(PluginEvent::PickCleared);
    }

    /// Releases the pick when its series has been hidden.
    pub(super) fn release_hidden_pick<R: Renderer, S: HostScheduler>(chart: &mut Chart<R, S>) {
        let hidden = chart.pick.current().is_some_and(|pick| {
            chart
                .series
                .get(&pick.series)
                .is_none_or(|series| !series.is_visible())
        });
        if hidden {
            Self::release_pick(chart, None);
        }
    }

    /// Resolves `event` against the legend and toggles the entry under it.
    pub(super) fn click<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
        event: PointerEvent,
    ) -> Option<LegendDatum> {
        let mut datum = chart
            .legend
            .datum_for_point(&chart.scene, event.x, event.y)?
            .clone();
        let Some(series) = chart.series.get_mut(&datum.id) else {
            debug!(series = %datum.id, "legend entry without attached series");
            return None;
        };

        datum.enabled = !datum.enabled;
        series.toggle_series_item(&datum.item_id, datum.enabled);
        debug!(
            series = %datum.id,
            item = %datum.item_id,
            enabled = datum.enabled,
            "legend item toggled"
        );
        Self::release_hidden_pick(chart);
        chart.set_data_pending(true);
        chart.emit_plugin_event(PluginEvent::LegendItemToggled {
            series_id: datum.id.clone(),
            item_id: datum.item_id.clone(),
            enabled: datum.enabled,
        });
        Some(datum)
    }
}

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    /// Hit-tests series nodes front to back and updates highlight and tooltip.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        PointerCoordinator::pointer_move(self, event);
    }

    /// Pointer left the whole surface.
    pub fn pointer_out(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        PointerCoordinator::pointer_out(self, event);
    }

    /// Toggles the legend entry under the click, returning it with its new
    /// enabled state. Series nodes are not considered.
    pub fn click(&mut self, event: PointerEvent) -> Option<LegendDatum> {
        if self.destroyed {
            return None;
        }
        PointerCoordinator::click(self, event)
    }
}
