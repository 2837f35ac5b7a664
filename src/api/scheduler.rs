use serde::{Deserialize, Serialize};
use tracing::trace;

/// Host suspension points the chart schedules work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskQueue {
    /// Deferred task on the next free tick (not frame aligned). Used for data passes.
    Tick,
    /// Display-frame callback, fires at most once per frame. Used for layout and redraw.
    Frame,
}

impl TaskQueue {
    const fn index(self) -> usize {
        match self {
            Self::Tick => 0,
            Self::Frame => 1,
        }
    }
}

/// Opaque handle of one scheduled callback. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wraps a host-issued callback id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Frame clock and deferred-task primitives provided by the host.
///
/// When a scheduled callback fires, the host hands its handle back to
/// [`Chart::run_scheduled`](super::Chart::run_scheduled). Cancelled handles
/// must not fire; if they do anyway, the chart ignores them.
pub trait HostScheduler {
    fn schedule(&mut self, queue: TaskQueue) -> TaskHandle;
    fn cancel(&mut self, handle: TaskHandle);
}

/// Deterministic scheduler for tests and headless hosts.
///
/// Nothing fires on its own: the owner drains outstanding handles explicitly,
/// which makes it a fake clock for both queues.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_raw: u64,
    outstanding: Vec<(TaskHandle, TaskQueue)>,
    scheduled_totals: [u64; 2],
    cancelled_total: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding handles of `queue` in schedule order.
    #[must_use]
    pub fn outstanding(&self, queue: TaskQueue) -> Vec<TaskHandle> {
        self.outstanding
            .iter()
            .filter(|(_, entry_queue)| *entry_queue == queue)
            .map(|(handle, _)| *handle)
            .collect()
    }

    #[must_use]
    pub fn pending_count(&self, queue: TaskQueue) -> usize {
        self.outstanding
            .iter()
            .filter(|(_, entry_queue)| *entry_queue == queue)
            .count()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Number of callbacks ever scheduled on `queue`.
    #[must_use]
    pub fn scheduled_total(&self, queue: TaskQueue) -> u64 {
        self.scheduled_totals[queue.index()]
    }

    #[must_use]
    pub fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }

    /// Removes `handle` from the outstanding set as if it fired.
    ///
    /// Returns `false` when it was cancelled or already fired.
    pub fn fire(&mut self, handle: TaskHandle) -> bool {
        let Some(position) = self
            .outstanding
            .iter()
            .position(|(entry, _)| *entry == handle)
        else {
            return false;
        };
        self.outstanding.remove(position);
        true
    }
}

impl HostScheduler for ManualScheduler {
    fn schedule(&mut self, queue: TaskQueue) -> TaskHandle {
        self.next_raw += 1;
        let handle = TaskHandle(self.next_raw);
        self.outstanding.push((handle, queue));
        self.scheduled_totals[queue.index()] += 1;
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        let before = self.outstanding.len();
        self.outstanding.retain(|(entry, _)| *entry != handle);
        if self.outstanding.len() != before {
            self.cancelled_total += 1;
        }
    }
}

/// Single-slot gate in front of one host queue.
///
/// At most one callback is outstanding per slot. Requesting while pending is a
/// no-op, cancelling forwards the cancellation to the host, and only the
/// outstanding handle can claim the slot when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSlot {
    queue: TaskQueue,
    handle: Option<TaskHandle>,
}

impl PendingSlot {
    #[must_use]
    pub const fn new(queue: TaskQueue) -> Self {
        Self {
            queue,
            handle: None,
        }
    }

    #[must_use]
    pub const fn queue(&self) -> TaskQueue {
        self.queue
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub const fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }

    /// Returns `true` when a new callback was scheduled.
    pub fn request<S: HostScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if self.handle.is_some() {
            return false;
        }
        let handle = scheduler.schedule(self.queue);
        trace!(queue = ?self.queue, handle = handle.raw(), "slot scheduled");
        self.handle = Some(handle);
        true
    }

    /// Returns `true` when an outstanding callback was cancelled.
    pub fn cancel<S: HostScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        trace!(queue = ?self.queue, handle = handle.raw(), "slot cancelled");
        scheduler.cancel(handle);
        true
    }

    /// Clears the slot if `handle` is its outstanding callback.
    pub fn claim(&mut self, handle: TaskHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{HostScheduler, ManualScheduler, PendingSlot, TaskQueue};

    #[test]
    fn slot_request_is_idempotent_while_pending() {
        let mut scheduler = ManualScheduler::new();
        let mut slot = PendingSlot::new(TaskQueue::Frame);

        assert!(slot.request(&mut scheduler));
        assert!(!slot.request(&mut scheduler));
        assert_eq!(scheduler.scheduled_total(TaskQueue::Frame), 1);
        assert_eq!(scheduler.pending_count(TaskQueue::Frame), 1);
    }

    #[test]
    fn cancelled_handle_cannot_claim_slot() {
        let mut scheduler = ManualScheduler::new();
        let mut slot = PendingSlot::new(TaskQueue::Tick);
        slot.request(&mut scheduler);
        let stale = slot.handle().expect("outstanding handle");

        assert!(slot.cancel(&mut scheduler));
        assert!(!slot.cancel(&mut scheduler));
        assert_eq!(scheduler.pending_count(TaskQueue::Tick), 0);
        assert_eq!(scheduler.cancelled_total(), 1);

        slot.request(&mut scheduler);
        assert!(!slot.claim(stale));
        assert!(slot.is_pending());
        let fresh = slot.handle().expect("fresh handle");
        assert_ne!(fresh, stale);
        assert!(slot.claim(fresh));
        assert!(!slot.is_pending());
    }

    #[test]
    fn manual_scheduler_keeps_queues_apart() {
        let mut scheduler = ManualScheduler::new();
        let tick = scheduler.schedule(TaskQueue::Tick);
        let frame = scheduler.schedule(TaskQueue::Frame);

        assert_eq!(scheduler.outstanding(TaskQueue::Tick), vec![tick]);
        assert_eq!(scheduler.outstanding(TaskQueue::Frame), vec![frame]);
        assert!(scheduler.fire(tick));
        assert!(!scheduler.fire(tick));
        assert!(scheduler.has_pending());
        scheduler.cancel(frame);
        assert!(!scheduler.has_pending());
    }
}
