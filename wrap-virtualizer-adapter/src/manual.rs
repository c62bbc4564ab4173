use alloc::collections::VecDeque;

use crate::{DeferredTask, Priority, TaskScheduler, TimerKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TimerSlot {
    interval_ms: u64,
    repeating: bool,
    due_ms: u64,
}

/// A [`TaskScheduler`] on a virtual clock.
///
/// Nothing runs by itself: the owner advances time and pops deferred tasks and expired timers.
/// [`crate::PanelController::advance_to`] does both in time order, which makes throttle and
/// debounce behavior fully deterministic in tests and simulations.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    deferred: VecDeque<(Priority, DeferredTask)>,
    throttle: Option<TimerSlot>,
    debounce: Option<TimerSlot>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Moves the clock forward. The clock never goes back.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Queued tasks in run order.
    pub fn deferred(&self) -> impl Iterator<Item = DeferredTask> + '_ {
        self.deferred.iter().map(|&(_, task)| task)
    }

    /// Pops the next deferred task: render priority first, FIFO within a priority.
    pub fn pop_deferred(&mut self) -> Option<DeferredTask> {
        self.deferred.pop_front().map(|(_, task)| task)
    }

    pub fn is_timer_running(&self, timer: TimerKind) -> bool {
        self.slot(timer).is_some()
    }

    /// When `timer` fires next, if running.
    pub fn timer_due(&self, timer: TimerKind) -> Option<u64> {
        self.slot(timer).map(|s| s.due_ms)
    }

    /// Pops the earliest timer due at or before `until_ms` and moves the clock to its due time.
    ///
    /// Repeating timers are rescheduled one interval later; one-shot timers stop. Ties go to the
    /// throttle timer.
    pub fn pop_due_timer(&mut self, until_ms: u64) -> Option<(TimerKind, u64)> {
        let timer = [TimerKind::Throttle, TimerKind::Debounce]
            .into_iter()
            .filter_map(|timer| self.slot(timer).map(|s| (timer, s.due_ms)))
            .filter(|&(_, due)| due <= until_ms)
            .min_by_key(|&(_, due)| due)
            .map(|(timer, _)| timer)?;

        let slot = self.slot_mut(timer);
        let fired = (*slot)?;
        *slot = fired.repeating.then(|| TimerSlot {
            // A zero interval would fire forever at the same instant.
            due_ms: fired.due_ms + fired.interval_ms.max(1),
            ..fired
        });
        self.set_now(fired.due_ms);
        Some((timer, fired.due_ms))
    }

    fn slot(&self, timer: TimerKind) -> Option<TimerSlot> {
        match timer {
            TimerKind::Throttle => self.throttle,
            TimerKind::Debounce => self.debounce,
        }
    }

    fn slot_mut(&mut self, timer: TimerKind) -> &mut Option<TimerSlot> {
        match timer {
            TimerKind::Throttle => &mut self.throttle,
            TimerKind::Debounce => &mut self.debounce,
        }
    }
}

impl TaskScheduler for ManualScheduler {
    fn post_deferred(&mut self, priority: Priority, task: DeferredTask) {
        let at = self
            .deferred
            .iter()
            .position(|&(p, _)| p > priority)
            .unwrap_or(self.deferred.len());
        self.deferred.insert(at, (priority, task));
    }

    fn start_timer(&mut self, timer: TimerKind, interval_ms: u64, repeating: bool) {
        let due_ms = self.now_ms + interval_ms;
        *self.slot_mut(timer) = Some(TimerSlot {
            interval_ms,
            repeating,
            due_ms,
        });
    }

    fn stop_timer(&mut self, timer: TimerKind) {
        *self.slot_mut(timer) = None;
    }
}
