use tracing::{debug, warn};

use crate::core::{Series, SeriesBinding, SeriesId};
use crate::render::Renderer;
use crate::scene::{NodeId, NodeKind};

use super::pointer_coordinator::PointerCoordinator;
use super::{Chart, HostScheduler};

impl<R: Renderer, S: HostScheduler> Chart<R, S> {
    /// Attaches `series`, placing it before `before` when that series is
    /// present and at the end otherwise.
    ///
    /// Returns `false` without side effects when a series with the same id is
    /// already attached.
    pub fn add_series(&mut self, series: Box<dyn Series>, before: Option<&SeriesId>) -> bool {
        let index = before.and_then(|anchor| self.series.get_index_of(anchor));
        self.insert_series_at(series, index)
    }

    /// Attaches `series` right after `after`, or at the front when `after`
    /// is `None` or not attached.
    ///
    /// Returns `false` without side effects for duplicate ids.
    pub fn add_series_after(&mut self, series: Box<dyn Series>, after: Option<&SeriesId>) -> bool {
        let index = match after.and_then(|anchor| self.series.get_index_of(anchor)) {
            Some(anchor_index) => anchor_index + 1,
            None => 0,
        };
        let index = (index < self.series.len()).then_some(index);
        self.insert_series_at(series, index)
    }

    /// Detaches the series with `id` and hands it back to the caller.
    pub fn remove_series(&mut self, id: &SeriesId) -> Option<Box<dyn Series>> {
        let mut series = self.series.shift_remove(id)?;
        self.detach_series(series.as_mut());
        debug!(chart = self.id.raw(), series = %id, "series removed");
        self.set_data_pending(true);
        Some(series)
    }

    /// Detaches every series, returning them in their former order.
    pub fn remove_all_series(&mut self) -> Vec<Box<dyn Series>> {
        let removed = std::mem::take(&mut self.series);
        let mut detached = Vec::with_capacity(removed.len());
        for (_, mut series) in removed {
            self.detach_series(series.as_mut());
            detached.push(series);
        }
        debug!(
            chart = self.id.raw(),
            count = detached.len(),
            "all series removed"
        );
        self.set_data_pending(true);
        detached
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Attached series ids in paint order (first is painted first).
    #[must_use]
    pub fn series_ids(&self) -> Vec<SeriesId> {
        self.series.keys().cloned().collect()
    }

    #[must_use]
    pub fn has_series(&self, id: &SeriesId) -> bool {
        self.series.contains_key(id)
    }

    #[must_use]
    pub fn series(&self, id: &SeriesId) -> Option<&dyn Series> {
        self.series.get(id).map(|series| series.as_ref())
    }

    /// Mutates an attached series and marks data dirty. Hiding the hovered
    /// series releases the pick.
    ///
    /// Returns `false` when no series has `id`.
    pub fn update_series(&mut self, id: &SeriesId, update: impl FnOnce(&mut dyn Series)) -> bool {
        let Some(series) = self.series.get_mut(id) else {
            return false;
        };
        update(series.as_mut());
        PointerCoordinator::release_hidden_pick(self);
        self.set_data_pending(true);
        true
    }

    /// Series groups as they appear under the series root.
    #[must_use]
    pub fn series_groups(&self) -> Vec<NodeId> {
        self.scene.children(self.series_root).to_vec()
    }

    fn insert_series_at(&mut self, mut series: Box<dyn Series>, index: Option<usize>) -> bool {
        let id = series.id().clone();
        if self.series.contains_key(&id) {
            debug!(chart = self.id.raw(), series = %id, "duplicate series rejected");
            return false;
        }

        let group = self.scene.create(NodeKind::Group);
        let anchor = index
            .and_then(|index| self.series.get_index(index))
            .and_then(|(_, anchor)| anchor.base().group());
        if let Err(err) = self.scene.insert_before(self.series_root, group, anchor) {
            warn!(series = %id, error = %err, "failed to attach series group");
            self.scene.destroy(group);
            return false;
        }

        series.base_mut().bind(SeriesBinding {
            chart: self.id,
            group,
        });
        series.set_data(&self.data);
        match index {
            Some(index) => {
                self.series.shift_insert(index, id.clone(), series);
            }
            None => {
                self.series.insert(id.clone(), series);
            }
        }
        debug!(
            chart = self.id.raw(),
            series = %id,
            count = self.series.len(),
            "series added"
        );
        self.set_data_pending(true);
        true
    }

    fn detach_series(&mut self, series: &mut dyn Series) {
        if self
            .pick
            .current()
            .is_some_and(|pick| &pick.series == series.id())
        {
            PointerCoordinator::release_pick(self, Some(&mut *series));
        }
        if let Some(group) = series.base().group() {
            self.scene.destroy(group);
        }
        series.base_mut().unbind();
    }
}
