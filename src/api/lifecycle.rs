use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ChartResult;
use crate::extensions::PluginEvent;
#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;
use crate::render::Renderer;

use super::layout_coordinator::LayoutCoordinator;
use super::pointer_coordinator::PointerCoordinator;
use super::{Chart, HostScheduler, ManualScheduler, TaskHandle, TaskQueue};

/// Completed pass counters since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifecycleStats {
    pub data_passes: u64,
    pub layout_passes: u64,
    pub redraws: u64,
}

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    #[must_use]
    pub fn is_data_pending(&self) -> bool {
        self.slots.data.is_pending()
    }

    #[must_use]
    pub fn is_layout_pending(&self) -> bool {
        self.slots.layout.is_pending()
    }

    #[must_use]
    pub fn is_redraw_pending(&self) -> bool {
        self.slots.redraw.is_pending()
    }

    /// Marks the chart's data dirty.
    ///
    /// Raising the flag cancels any scheduled redraw and layout (the data pass
    /// re-requests layout when it completes) and schedules one data pass on
    /// the tick queue. Clearing it cancels the outstanding data pass and
    /// reschedules a layout that was held back behind it.
    pub fn set_data_pending(&mut self, pending: bool) {
        if self.destroyed {
            return;
        }
        if !pending {
            if self.slots.data.cancel(&mut self.scheduler) {
                trace!(chart = self.id.raw(), "data pass cancelled");
            }
            if std::mem::take(&mut self.slots.layout_deferred)
                && self.slots.layout.request(&mut self.scheduler)
            {
                trace!(chart = self.id.raw(), "deferred layout pass scheduled");
            }
            return;
        }

        self.cancel_scheduled_redraw();
        if self.slots.layout.cancel(&mut self.scheduler) {
            self.slots.layout_deferred = true;
        }
        if self.slots.data.request(&mut self.scheduler) {
            trace!(chart = self.id.raw(), "data pass scheduled");
        }
    }

    /// Marks the chart's layout dirty.
    ///
    /// While a data pass is pending the request is absorbed: the data pass
    /// requests layout itself once it has run.
    pub fn set_layout_pending(&mut self, pending: bool) {
        if self.destroyed {
            return;
        }
        if !pending {
            self.slots.layout_deferred = false;
            if self.slots.layout.cancel(&mut self.scheduler) {
                trace!(chart = self.id.raw(), "layout pass cancelled");
            }
            return;
        }

        if self.slots.data.is_pending() {
            trace!(chart = self.id.raw(), "layout deferred behind pending data pass");
            self.slots.layout_deferred = true;
            return;
        }
        if self.slots.layout.request(&mut self.scheduler) {
            trace!(chart = self.id.raw(), "layout pass scheduled");
        }
    }

    /// Schedules a redraw on the next frame unless one is already scheduled.
    pub fn request_redraw(&mut self) {
        if self.destroyed {
            return;
        }
        self.slots.redraw.request(&mut self.scheduler);
    }

    pub fn cancel_scheduled_redraw(&mut self) {
        self.slots.redraw.cancel(&mut self.scheduler);
    }

    /// Runs the pass owning `handle`.
    ///
    /// Returns `Ok(false)` for handles that are stale (cancelled, already run)
    /// or arrive after `destroy`. A failing pass stops at the failing series
    /// and does not request the next pass.
    pub fn run_scheduled(&mut self, handle: TaskHandle) -> ChartResult<bool> {
        if self.destroyed {
            trace!(handle = handle.raw(), "callback after destroy ignored");
            return Ok(false);
        }
        if self.slots.data.claim(handle) {
            self.process_data()?;
            return Ok(true);
        }
        if self.slots.layout.claim(handle) {
            self.perform_layout()?;
            return Ok(true);
        }
        if self.slots.redraw.claim(handle) {
            self.redraw()?;
            return Ok(true);
        }
        trace!(handle = handle.raw(), "stale callback ignored");
        Ok(false)
    }

    /// Data pass: lets every visible series derive drawable data, rebuilds the
    /// legend data from series in order, then requests layout.
    pub fn process_data(&mut self) -> ChartResult<()> {
        let mut legend_data = Vec::new();
        for series in self.series.values_mut() {
            if series.is_visible() {
                series.process_data()?;
            }
            if series.show_in_legend() {
                series.list_series_items(&mut legend_data);
            }
        }

        let legend_items = legend_data.len();
        self.legend.set_data(legend_data);
        self.stats.data_passes += 1;
        debug!(
            chart = self.id.raw(),
            series = self.series.len(),
            legend_items,
            "data pass complete"
        );
        self.emit_plugin_event(PluginEvent::DataProcessed { legend_items });
        self.slots.layout_deferred = false;
        self.set_layout_pending(true);
        Ok(())
    }

    /// Layout pass: background, captions, legend, then the series rectangle
    /// shared by all series. Requests a redraw when done.
    pub fn perform_layout(&mut self) -> ChartResult<()> {
        LayoutCoordinator::layout_background(self)?;
        LayoutCoordinator::position_captions(self)?;
        LayoutCoordinator::position_legend(self)?;
        LayoutCoordinator::layout_series(self)?;

        self.stats.layout_passes += 1;
        debug!(
            chart = self.id.raw(),
            pass = self.stats.layout_passes,
            caption_padding = self.layout.caption_auto_padding,
            "layout pass complete"
        );
        self.emit_plugin_event(PluginEvent::LayoutDone {
            pass: self.stats.layout_passes,
        });
        self.request_redraw();
        Ok(())
    }

    /// Scheduled redraw. Skipped while a data or layout pass is outstanding;
    /// the layout pass requests another redraw once it has run.
    fn redraw(&mut self) -> ChartResult<()> {
        if self.slots.data.is_pending() || self.slots.layout.is_pending() {
            trace!(chart = self.id.raw(), "redraw deferred behind pending passes");
            return Ok(());
        }
        self.render()
    }

    /// Paints the current scene synchronously.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.scene.render_frame();
        self.renderer.render(&frame)?;
        self.stats.redraws += 1;
        trace!(
            chart = self.id.raw(),
            commands = frame.commands.len(),
            "frame rendered"
        );
        self.emit_plugin_event(PluginEvent::Rendered);
        Ok(())
    }

    /// Paints the current scene into an external cairo context.
    ///
    /// This path is used by toolkit draw callbacks while keeping the renderer
    /// implementation decoupled from toolkit-specific APIs.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.scene.render_frame();
        self.renderer.render_on_cairo_context(context, &frame)?;
        self.stats.redraws += 1;
        self.emit_plugin_event(PluginEvent::Rendered);
        Ok(())
    }

    /// Cancels every outstanding callback and detaches the tooltip surface.
    ///
    /// Idempotent. Run automatically on drop.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.slots.data.cancel(&mut self.scheduler);
        self.slots.layout.cancel(&mut self.scheduler);
        self.slots.redraw.cancel(&mut self.scheduler);
        self.slots.layout_deferred = false;

        PointerCoordinator::release_pick(self, None);
        self.tooltip.hide();
        self.tooltip.detach();
        self.destroyed = true;
        debug!(chart = self.id.raw(), "chart destroyed");
    }
}

impl<R: Renderer> Chart<R, ManualScheduler> {
    /// Fires every tick callback outstanding when the turn starts.
    ///
    /// Returns the number of passes that ran.
    pub fn run_ticks(&mut self) -> ChartResult<usize> {
        self.run_queue(TaskQueue::Tick)
    }

    /// Fires every frame callback outstanding when the frame starts.
    pub fn run_frame(&mut self) -> ChartResult<usize> {
        self.run_queue(TaskQueue::Frame)
    }

    /// Alternates tick and frame turns until nothing is outstanding or
    /// `max_turns` is reached. Returns the number of turns taken.
    pub fn run_until_idle(&mut self, max_turns: usize) -> ChartResult<usize> {
        let mut turns = 0;
        while turns < max_turns && self.scheduler.has_pending() {
            self.run_ticks()?;
            self.run_frame()?;
            turns += 1;
        }
        Ok(turns)
    }

    fn run_queue(&mut self, queue: TaskQueue) -> ChartResult<usize> {
        let mut ran = 0;
        for handle in self.scheduler.outstanding(queue) {
            // Earlier callbacks of this turn may have cancelled later ones.
            if !self.scheduler.fire(handle) {
                continue;
            }
            if self.run_scheduled(handle)? {
                ran += 1;
            }
        }
        Ok(ran)
    }
}
