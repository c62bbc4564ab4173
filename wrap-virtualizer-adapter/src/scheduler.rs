use wrap_virtualizer::ViewportState;

use crate::{DeferredTask, Priority, TaskScheduler, TimerKind};

/// What the caller should do with a viewport notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportDecision {
    /// Run a viewport pass now. `width_changed` requests a full recycle and rebuild.
    Apply {
        viewport: ViewportState,
        width_changed: bool,
    },
    /// Stored as the pending viewport; the throttle timer will apply it.
    Throttled,
    /// Arrived during a pass; a follow-up pass was requested.
    Deferred,
    /// Not ready (negative top or empty size).
    Ignored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottleState {
    #[default]
    Idle,
    Throttled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DebounceState {
    #[default]
    Idle,
    Debouncing,
}

/// Throttle, debounce and re-entrancy state machine for the panel.
///
/// Three channels feed it:
/// - viewport motion, throttled to one applied pass per `throttle_interval_ms` with a single
///   latest-wins pending slot; a width change bypasses the throttle,
/// - sizing-policy changes, debounced by `debounce_interval_ms`,
/// - collection mutations, coalesced into one queued background refresh.
///
/// All channels share one in-pass guard. The scheduler never runs a pass itself; it tells the
/// caller when to, and arms or stops host timers through a [`TaskScheduler`].
#[derive(Clone, Debug)]
pub struct ViewportScheduler {
    throttle_interval_ms: u64,
    debounce_interval_ms: u64,

    current: Option<ViewportState>,
    pending: Option<ViewportState>,
    last_applied_ms: Option<u64>,

    throttle: ThrottleState,
    debounce: DebounceState,
    refresh_queued: bool,
    follow_up_queued: bool,
    in_pass: bool,
}

impl ViewportScheduler {
    pub fn new(throttle_interval_ms: u64, debounce_interval_ms: u64) -> Self {
        Self {
            throttle_interval_ms,
            debounce_interval_ms,
            current: None,
            pending: None,
            last_applied_ms: None,
            throttle: ThrottleState::Idle,
            debounce: DebounceState::Idle,
            refresh_queued: false,
            follow_up_queued: false,
            in_pass: false,
        }
    }

    pub fn throttle_interval_ms(&self) -> u64 {
        self.throttle_interval_ms
    }

    pub fn debounce_interval_ms(&self) -> u64 {
        self.debounce_interval_ms
    }

    /// The viewport of the last applied pass.
    pub fn current(&self) -> Option<ViewportState> {
        self.current
    }

    pub fn pending(&self) -> Option<ViewportState> {
        self.pending
    }

    pub fn last_applied_ms(&self) -> Option<u64> {
        self.last_applied_ms
    }

    pub fn throttle_state(&self) -> ThrottleState {
        self.throttle
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debounce
    }

    pub fn is_refresh_queued(&self) -> bool {
        self.refresh_queued
    }

    pub fn is_follow_up_queued(&self) -> bool {
        self.follow_up_queued
    }

    pub fn is_in_pass(&self) -> bool {
        self.in_pass
    }

    /// Whether `viewport` has a different width (beyond 1px) than the last applied one.
    pub fn width_changed(&self, viewport: &ViewportState) -> bool {
        self.current
            .as_ref()
            .is_none_or(|current| current.width_differs(viewport))
    }

    pub fn on_viewport_changed<H: TaskScheduler + ?Sized>(
        &mut self,
        viewport: ViewportState,
        now_ms: u64,
        host: &mut H,
    ) -> ViewportDecision {
        if !viewport.is_ready() {
            vtrace!(
                top = viewport.top,
                width = viewport.width,
                height = viewport.height,
                "ViewportScheduler: viewport not ready"
            );
            return ViewportDecision::Ignored;
        }

        if self.in_pass {
            self.pending = Some(viewport);
            self.request_follow_up(host);
            return ViewportDecision::Deferred;
        }

        let width_changed = self.width_changed(&viewport);
        let within_interval = self
            .last_applied_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.throttle_interval_ms);

        if !width_changed && within_interval {
            self.pending = Some(viewport);
            if self.throttle == ThrottleState::Idle {
                host.start_timer(TimerKind::Throttle, self.throttle_interval_ms, true);
                self.throttle = ThrottleState::Throttled;
            }
            return ViewportDecision::Throttled;
        }

        self.pending = None;
        if width_changed && self.debounce == DebounceState::Debouncing {
            // The rebuild below already picks up the latest policy.
            host.stop_timer(TimerKind::Debounce);
            self.debounce = DebounceState::Idle;
            vdebug!("ViewportScheduler: width change cancels pending debounce");
        }
        ViewportDecision::Apply {
            viewport,
            width_changed,
        }
    }

    /// Throttle timer expiration. Returns the pending viewport to apply, if any.
    ///
    /// With nothing pending the timer is stopped and the channel goes idle.
    pub fn on_throttle_timer<H: TaskScheduler + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Option<(ViewportState, bool)> {
        if self.in_pass {
            // Still pending; the repeating timer fires again.
            return None;
        }
        match self.pending.take() {
            Some(viewport) => {
                let width_changed = self.width_changed(&viewport);
                Some((viewport, width_changed))
            }
            None => {
                host.stop_timer(TimerKind::Throttle);
                self.throttle = ThrottleState::Idle;
                None
            }
        }
    }

    /// A sizing-policy change: restarts the debounce window.
    pub fn on_policy_changed<H: TaskScheduler + ?Sized>(&mut self, host: &mut H) {
        host.start_timer(TimerKind::Debounce, self.debounce_interval_ms, false);
        self.debounce = DebounceState::Debouncing;
    }

    /// Debounce timer expiration. Returns `true` when the in-place update should run now.
    pub fn on_debounce_timer<H: TaskScheduler + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.debounce == DebounceState::Idle {
            return false;
        }
        if self.in_pass {
            host.start_timer(TimerKind::Debounce, self.debounce_interval_ms, false);
            return false;
        }
        self.debounce = DebounceState::Idle;
        true
    }

    /// A collection mutation: queues one background refresh. Returns `false` when a refresh was
    /// already queued.
    pub fn on_collection_changed<H: TaskScheduler + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.refresh_queued {
            return false;
        }
        self.refresh_queued = true;
        host.post_deferred(Priority::Background, DeferredTask::Refresh);
        true
    }

    /// Consumes the queued refresh and stops both timers.
    ///
    /// Returns `None` for a stale refresh task (nothing queued, e.g. after a detach), and for a
    /// refresh arriving during a pass, which is posted again with the pending viewport kept.
    /// Otherwise returns the viewport the refresh should render: the pending one, which the
    /// stopped throttle timer would have applied, else the current one.
    pub fn begin_refresh<H: TaskScheduler + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Option<Option<ViewportState>> {
        if !self.refresh_queued {
            return None;
        }
        if self.in_pass {
            host.post_deferred(Priority::Background, DeferredTask::Refresh);
            return None;
        }
        self.refresh_queued = false;
        self.stop_timers(host);
        Some(self.pending.take().or(self.current))
    }

    /// Consumes the queued follow-up. Returns the viewport it should re-evaluate: the pending one,
    /// else the current one.
    pub fn take_follow_up(&mut self) -> Option<(ViewportState, bool)> {
        if !core::mem::take(&mut self.follow_up_queued) {
            return None;
        }
        let viewport = self.pending.take().or(self.current)?;
        let width_changed = self.width_changed(&viewport);
        Some((viewport, width_changed))
    }

    /// Enters the pass guard. Returns `false` when a pass is already running.
    pub fn begin_pass(&mut self) -> bool {
        if self.in_pass {
            return false;
        }
        self.in_pass = true;
        true
    }

    pub fn end_pass(&mut self) {
        self.in_pass = false;
    }

    /// Records `viewport` as applied at `now_ms`.
    pub fn mark_applied(&mut self, viewport: ViewportState, now_ms: u64) {
        self.current = Some(viewport);
        self.last_applied_ms = Some(now_ms);
    }

    /// Coalesces a request that cannot run now into one deferred follow-up pass.
    pub fn request_follow_up<H: TaskScheduler + ?Sized>(&mut self, host: &mut H) {
        if self.follow_up_queued {
            return;
        }
        self.follow_up_queued = true;
        host.post_deferred(Priority::Render, DeferredTask::FollowUp);
    }

    pub fn forget_viewport(&mut self) {
        self.current = None;
        self.pending = None;
        self.last_applied_ms = None;
    }

    /// Stops every timer and drops all queued state. Tasks already posted become stale and are
    /// ignored when they come back.
    pub fn detach<H: TaskScheduler + ?Sized>(&mut self, host: &mut H) {
        self.stop_timers(host);
        self.forget_viewport();
        self.refresh_queued = false;
        self.follow_up_queued = false;
        self.in_pass = false;
    }

    fn stop_timers<H: TaskScheduler + ?Sized>(&mut self, host: &mut H) {
        host.stop_timer(TimerKind::Throttle);
        host.stop_timer(TimerKind::Debounce);
        self.throttle = ThrottleState::Idle;
        self.debounce = DebounceState::Idle;
    }
}
