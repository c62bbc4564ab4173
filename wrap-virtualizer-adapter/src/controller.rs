use alloc::vec::Vec;

use wrap_virtualizer::{
    Direction, IndexRange, LayoutCalculator, LayoutOptions, NavigationTarget, Rect, Size,
    ViewportState, navigation_target,
};

use crate::{
    CollectionChange, DeferredTask, ElementFactory, ElementPool, ItemSource, ManualScheduler,
    PanelOptions, Priority, RealizeError, RealizedElement, TaskScheduler, TimerKind,
    ViewportDecision, ViewportScheduler,
};

/// Counters accumulated over the controller's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelStats {
    pub viewport_passes: u64,
    pub in_place_passes: u64,
    pub refreshes: u64,
    pub created: u64,
    pub destroyed: u64,
    /// Elements moved by in-place updates.
    pub relocated: u64,
    pub load_more_requests: u64,
    pub last_in_place_ms: Option<u64>,
}

/// What the last viewport pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassOutcome {
    pub viewport: ViewportState,
    pub visible: Option<IndexRange>,
    pub created: usize,
    pub updated: usize,
    pub recycled: usize,
    pub failures: Vec<RealizeError>,
    pub load_more_requested: bool,
}

/// A virtualizing wrap panel, minus the UI.
///
/// The controller owns the layout cache, the element pool and the scheduling state. The host
/// drives it with plain calls:
/// - `on_viewport_changed` when the scroll position or viewport size changes,
/// - `on_collection_changed` after mutating the item source,
/// - `on_timer` / `run_deferred` when a timer or task posted through the [`TaskScheduler`] fires,
/// - `measure` / `arrange` from its layout protocol.
///
/// Every call is synchronous and single-threaded. Policy changes are debounced, viewport motion
/// is throttled, and mutations are coalesced into one deferred refresh.
pub struct PanelController<S, F, H>
where
    S: ItemSource,
    F: ElementFactory<Item = S::Item>,
    H: TaskScheduler,
{
    source: S,
    factory: F,
    host: H,
    options: PanelOptions,

    layout: LayoutCalculator,
    pool: ElementPool<F::Visual>,
    scheduler: ViewportScheduler,

    bounds: Size,
    loading_more: bool,
    stats: PanelStats,
    last_pass: Option<PassOutcome>,
}

impl<S, F, H> PanelController<S, F, H>
where
    S: ItemSource,
    F: ElementFactory<Item = S::Item>,
    H: TaskScheduler,
{
    pub fn new(source: S, factory: F, host: H, options: PanelOptions) -> Self {
        let options = options.normalized();
        Self {
            layout: LayoutCalculator::new(options.layout),
            pool: ElementPool::new(),
            scheduler: ViewportScheduler::new(
                options.throttle_interval_ms,
                options.debounce_interval_ms,
            ),
            source,
            factory,
            host,
            options,
            bounds: Size::ZERO,
            loading_more: false,
            stats: PanelStats::default(),
            last_pass: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the item source. Report every mutation with
    /// [`Self::on_collection_changed`].
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn layout(&self) -> &LayoutCalculator {
        &self.layout
    }

    pub fn pool(&self) -> &ElementPool<F::Visual> {
        &self.pool
    }

    pub fn scheduler(&self) -> &ViewportScheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> PanelStats {
        self.stats
    }

    pub fn last_pass(&self) -> Option<&PassOutcome> {
        self.last_pass.as_ref()
    }

    /// The last size handed to [`Self::measure`].
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn item_count(&self) -> usize {
        self.source.count()
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn set_has_more_items(&mut self, has_more_items: bool) {
        self.options.has_more_items = has_more_items;
    }

    pub fn set_recycle_cap(&mut self, recycle_cap: usize) {
        self.options.recycle_cap = recycle_cap.max(1);
    }

    /// Reports a viewport change (scroll or resize).
    pub fn on_viewport_changed(&mut self, viewport: ViewportState, now_ms: u64) -> ViewportDecision {
        let decision = self
            .scheduler
            .on_viewport_changed(viewport, now_ms, &mut self.host);
        if let ViewportDecision::Apply {
            viewport,
            width_changed,
        } = decision
        {
            self.process_viewport(viewport, width_changed, now_ms);
        }
        decision
    }

    /// A timer started through the [`TaskScheduler`] expired.
    pub fn on_timer(&mut self, timer: TimerKind, now_ms: u64) {
        match timer {
            TimerKind::Throttle => {
                if let Some((viewport, width_changed)) =
                    self.scheduler.on_throttle_timer(&mut self.host)
                {
                    self.process_viewport(viewport, width_changed, now_ms);
                }
            }
            TimerKind::Debounce => {
                if self.scheduler.on_debounce_timer(&mut self.host) {
                    self.update_in_place(now_ms);
                }
            }
        }
    }

    /// Runs a task posted through [`TaskScheduler::post_deferred`]. Stale tasks are ignored.
    pub fn run_deferred(&mut self, task: DeferredTask, now_ms: u64) {
        match task {
            DeferredTask::Refresh => self.refresh(now_ms),
            DeferredTask::LoadMore => self.raise_load_more(),
            DeferredTask::FollowUp => {
                if let Some((viewport, width_changed)) = self.scheduler.take_follow_up() {
                    self.process_viewport(viewport, width_changed, now_ms);
                }
            }
        }
    }

    /// Reports a mutation of the item source. Bursts coalesce into a single deferred refresh.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn on_collection_changed(&mut self, change: CollectionChange) {
        vdebug!(
            ?change,
            affected = ?change.affected_range(),
            "PanelController: collection changed"
        );
        self.layout.invalidate();
        self.scheduler.on_collection_changed(&mut self.host);
    }

    /// Replaces the sizing policy. Returns `true` when item geometry changed, in which case an
    /// in-place update is debounced.
    pub fn set_layout_options(&mut self, layout: LayoutOptions) -> bool {
        let changed = self.layout.set_options(layout);
        self.after_policy_change(changed)
    }

    pub fn set_estimated_item_size(&mut self, width: f64, height: f64) -> bool {
        let changed = self.layout.set_estimated_item_size(width, height);
        self.after_policy_change(changed)
    }

    pub fn set_spacing(&mut self, horizontal: f64, vertical: f64) -> bool {
        let changed = self.layout.set_spacing(horizontal, vertical);
        self.after_policy_change(changed)
    }

    pub fn set_use_fixed_item_size(&mut self, use_fixed_item_size: bool) -> bool {
        let changed = self.layout.set_use_fixed_item_size(use_fixed_item_size);
        self.after_policy_change(changed)
    }

    pub fn set_fill_available_space(&mut self, fill_available_space: bool) -> bool {
        let changed = self.layout.set_fill_available_space(fill_available_space);
        self.after_policy_change(changed)
    }

    fn after_policy_change(&mut self, changed: bool) -> bool {
        self.options.layout = *self.layout.options();
        if changed {
            self.scheduler.on_policy_changed(&mut self.host);
        }
        changed
    }

    /// Measure protocol: returns the panel's desired size for `available`.
    ///
    /// Computes the first layout when none exists yet, then measures every pooled element with
    /// the policy's constraint. In adaptive mode the desired sizes feed the high-water mark; a
    /// raised mark is applied through the debounced in-place update.
    pub fn measure(&mut self, available: Size) -> Size {
        self.bounds = available;
        let count = self.source.count();
        if count == 0 {
            return Size::ZERO;
        }

        if self.layout.row_count() == 0 {
            if let Some(width) = available.usable_width() {
                self.layout.recalculate(count, width);
            }
        }

        let constraint = self.layout.measure_constraint();
        let mut raised = false;
        for (_, element) in self.pool.iter_mut() {
            if let Some(desired) = self.factory.measure(&mut element.visual, constraint) {
                raised |= self.layout.observe_item_size(desired);
            }
        }
        if raised {
            self.scheduler.on_policy_changed(&mut self.host);
        }

        let panel = self.layout.panel_size();
        let width = if self.layout.options().fill_available_space {
            available.usable_width().unwrap_or(panel.width)
        } else {
            self.layout.content_width(count)
        };
        Size::new(width, panel.height)
    }

    /// Arrange protocol: positions every pooled element at its cached offset with the current
    /// effective item size.
    pub fn arrange(&mut self, final_size: Size) -> Size {
        let item = self.layout.effective_item_size();
        for (_, element) in self.pool.iter_mut() {
            let rect = Rect::new(element.rect.left, element.rect.top, item.width, item.height);
            self.factory.arrange(&mut element.visual, rect);
        }
        final_size
    }

    pub fn element_for_index(&self, index: usize) -> Option<&F::Visual> {
        self.pool.get(index)
    }

    pub fn index_for_element(&self, visual: &F::Visual) -> Option<usize>
    where
        F::Visual: PartialEq,
    {
        self.pool.index_of(visual)
    }

    /// Pooled elements in ascending index order.
    pub fn realized_elements(&self) -> impl Iterator<Item = (usize, &F::Visual)> {
        self.pool.iter().map(|(i, e)| (i, &e.visual))
    }

    /// The pooled element at `index` with its geometry, for the host to scroll to. Unrealized
    /// indexes yield `None`.
    pub fn scroll_into_view(&self, index: usize) -> Option<&RealizedElement<F::Visual>> {
        self.pool.element(index)
    }

    /// Keyboard navigation from `from` (or from before the first item when `None`).
    ///
    /// Only already realized elements are returned.
    pub fn navigate(
        &self,
        direction: Direction,
        from: Option<&F::Visual>,
        wrap: bool,
    ) -> Option<&F::Visual>
    where
        F::Visual: PartialEq,
    {
        let from = from.and_then(|visual| self.pool.index_of(visual));
        let target = navigation_target(
            direction,
            from,
            self.source.count(),
            self.layout.items_per_row(),
            wrap,
        );
        match target {
            NavigationTarget::Unchanged => from.and_then(|i| self.pool.get(i)),
            NavigationTarget::Index(index) => self.pool.get(index),
            NavigationTarget::None => None,
        }
    }

    /// Tears the panel down: stops timers, drops pending work and the row cache, and releases
    /// every pooled element.
    pub fn detach(&mut self) {
        self.scheduler.detach(&mut self.host);
        self.layout.reset_to_empty();
        let released = self.pool.recycle_all(&mut self.factory);
        self.stats.destroyed += released as u64;
        self.loading_more = false;
        self.last_pass = None;
        vdebug!(released, "PanelController::detach");
    }

    fn process_viewport(&mut self, viewport: ViewportState, width_changed: bool, now_ms: u64) {
        if !self.scheduler.begin_pass() {
            self.scheduler.request_follow_up(&mut self.host);
            return;
        }
        self.scheduler.mark_applied(viewport, now_ms);
        self.stats.viewport_passes += 1;

        let count = self.source.count();
        let mut outcome = PassOutcome {
            viewport,
            ..PassOutcome::default()
        };

        if width_changed || count == 0 {
            outcome.recycled += self.pool.recycle_all(&mut self.factory);
            self.layout.invalidate();
        }
        if count == 0 {
            self.layout.reset_to_empty();
        } else if width_changed || self.layout.needs_recalculate(count) {
            self.layout.recalculate(count, viewport.width);
        }

        outcome.visible =
            self.layout
                .visible_range(viewport.top, viewport.height, self.options.overscan_rows);
        if let Some(range) = outcome.visible {
            let report = self
                .pool
                .realize(range, &self.layout, &self.source, &mut self.factory);
            outcome.created = report.created;
            outcome.updated = report.updated;
            outcome.failures = report.failures;
        }
        outcome.recycled += self.pool.recycle_out_of_range(
            outcome.visible,
            self.options.buffer_rows,
            self.layout.items_per_row(),
            count,
            self.options.recycle_cap,
            &mut self.factory,
        );

        self.stats.created += outcome.created as u64;
        self.stats.destroyed += outcome.recycled as u64;
        self.scheduler.end_pass();

        vtrace!(
            top = viewport.top,
            width_changed,
            created = outcome.created,
            recycled = outcome.recycled,
            pooled = self.pool.len(),
            "PanelController: viewport pass"
        );

        self.notify_invalidate();
        outcome.load_more_requested = self.check_load_more(&viewport);
        self.last_pass = Some(outcome);
    }

    /// Debounced policy update: rewrites the geometry of every pooled element without creating or
    /// destroying any, then re-evaluates visibility for the current viewport.
    fn update_in_place(&mut self, now_ms: u64) {
        if !self.scheduler.begin_pass() {
            self.scheduler.on_policy_changed(&mut self.host);
            return;
        }
        self.stats.in_place_passes += 1;
        self.stats.last_in_place_ms = Some(now_ms);

        let count = self.source.count();
        let current = self.scheduler.current();
        if count == 0 {
            self.layout.reset_to_empty();
        } else {
            let width = current.map_or(self.bounds.width, |v| v.width);
            self.layout.recalculate(count, width);
            let updated = self.pool.update_all_in_place(&self.layout, count);
            self.stats.relocated += updated as u64;
            vdebug!(updated, "PanelController: in-place update");
        }
        self.scheduler.end_pass();

        match current {
            Some(viewport) => self.process_viewport(viewport, false, now_ms),
            None => self.notify_invalidate(),
        }
    }

    /// Full refresh after collection mutations.
    fn refresh(&mut self, now_ms: u64) {
        let Some(latest) = self.scheduler.begin_refresh(&mut self.host) else {
            return;
        };
        if !self.scheduler.begin_pass() {
            return;
        }
        self.stats.refreshes += 1;

        let count = self.source.count();
        let released = self.pool.recycle_all(&mut self.factory);
        self.stats.destroyed += released as u64;
        vdebug!(count, released, "PanelController::refresh");

        if count == 0 {
            self.layout.reset_to_empty();
            self.scheduler.end_pass();
            self.last_pass = None;
            self.notify_invalidate();
            return;
        }

        let target = latest
            .filter(ViewportState::is_ready)
            .or_else(|| {
                let width = self.bounds.usable_width()?;
                let height = self.bounds.usable_height()?;
                Some(ViewportState::new(0.0, height, width))
            });

        // Without any viewport the fallback width still gives the host a layout to measure.
        let width = target.map_or(self.bounds.width, |v| v.width);
        self.layout.recalculate(count, width);
        self.scheduler.end_pass();

        match target {
            Some(viewport) => self.process_viewport(viewport, false, now_ms),
            None => self.notify_invalidate(),
        }
    }

    fn check_load_more(&mut self, viewport: &ViewportState) -> bool {
        if !self.options.has_more_items || self.loading_more {
            return false;
        }
        let trigger = self.layout.panel_size().height - self.options.load_more_threshold;
        if viewport.bottom() < trigger {
            return false;
        }
        self.loading_more = true;
        self.stats.load_more_requests += 1;
        self.host
            .post_deferred(Priority::Background, DeferredTask::LoadMore);
        vdebug!(
            bottom = viewport.bottom(),
            panel_height = self.layout.panel_size().height,
            "PanelController: load more requested"
        );
        true
    }

    fn raise_load_more(&mut self) {
        if !self.loading_more {
            return;
        }
        if let Some(on_load_more) = self.options.on_load_more.clone() {
            on_load_more();
        }
        self.loading_more = false;
    }

    fn notify_invalidate(&self) {
        if let Some(on_invalidate) = &self.options.on_invalidate {
            on_invalidate();
        }
    }
}

impl<S, F> PanelController<S, F, ManualScheduler>
where
    S: ItemSource,
    F: ElementFactory<Item = S::Item>,
{
    /// Runs every deferred task queued at the current virtual time.
    pub fn run_pending(&mut self) {
        while let Some(task) = self.host.pop_deferred() {
            let now_ms = self.host.now_ms();
            self.run_deferred(task, now_ms);
        }
    }

    /// Advances the virtual clock to `now_ms`, running deferred tasks and expired timers in time
    /// order.
    pub fn advance_to(&mut self, now_ms: u64) {
        loop {
            self.run_pending();
            match self.host.pop_due_timer(now_ms) {
                Some((timer, at)) => self.on_timer(timer, at),
                None => break,
            }
        }
        self.host.set_now(now_ms);
        self.run_pending();
    }
}

impl<S, F, H> core::fmt::Debug for PanelController<S, F, H>
where
    S: ItemSource,
    F: ElementFactory<Item = S::Item>,
    H: TaskScheduler,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PanelController")
            .field("item_count", &self.source.count())
            .field("options", &self.options)
            .field("layout", &self.layout.snapshot())
            .field("pooled", &self.pool.len())
            .field("scheduler", &self.scheduler)
            .field("bounds", &self.bounds)
            .field("loading_more", &self.loading_more)
            .field("stats", &self.stats)
            .finish()
    }
}
