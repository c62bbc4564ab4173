use alloc::sync::Arc;

use wrap_virtualizer::LayoutOptions;

/// Called once per load cycle when the viewport nears the end of the content.
pub type LoadMoreCallback = Arc<dyn Fn() + Send + Sync>;

/// Called after a pass changed what the host should measure and arrange.
pub type InvalidateCallback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for [`crate::PanelController`].
///
/// Layout geometry lives in [`LayoutOptions`]; everything else here drives buffering, recycling,
/// scheduling and infinite scroll. Out-of-domain values are clamped, never rejected.
///
/// Cloning is cheap: callbacks are stored in `Arc`s.
#[derive(Clone)]
pub struct PanelOptions {
    pub layout: LayoutOptions,

    /// Extra rows realized above and below the visible rows.
    pub overscan_rows: usize,
    /// Rows kept alive on each side of the visible range before an element becomes a recycling
    /// candidate.
    pub buffer_rows: usize,
    /// Maximum number of elements recycled by a single pass (`>= 1`).
    pub recycle_cap: usize,

    /// Minimum spacing between two applied viewport passes when the width is unchanged.
    pub throttle_interval_ms: u64,
    /// Quiet period after the last sizing-policy change before the in-place update runs.
    pub debounce_interval_ms: u64,

    /// Distance from the end of the content (px) at which more items are requested.
    pub load_more_threshold: f64,
    /// Whether the source can still grow. Load-more is never raised while this is `false`.
    pub has_more_items: bool,
    pub on_load_more: Option<LoadMoreCallback>,

    pub on_invalidate: Option<InvalidateCallback>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl PanelOptions {
    pub fn new(layout: LayoutOptions) -> Self {
        Self {
            layout: layout.normalized(),
            overscan_rows: 2,
            buffer_rows: 5,
            recycle_cap: 30,
            throttle_interval_ms: 16,
            debounce_interval_ms: 50,
            load_more_threshold: 300.0,
            has_more_items: true,
            on_load_more: None,
            on_invalidate: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout.normalized();
        self
    }

    pub fn with_overscan_rows(mut self, overscan_rows: usize) -> Self {
        self.overscan_rows = overscan_rows;
        self
    }

    pub fn with_buffer_rows(mut self, buffer_rows: usize) -> Self {
        self.buffer_rows = buffer_rows;
        self
    }

    pub fn with_recycle_cap(mut self, recycle_cap: usize) -> Self {
        self.recycle_cap = recycle_cap.max(1);
        self
    }

    pub fn with_throttle_interval_ms(mut self, throttle_interval_ms: u64) -> Self {
        self.throttle_interval_ms = throttle_interval_ms;
        self
    }

    pub fn with_debounce_interval_ms(mut self, debounce_interval_ms: u64) -> Self {
        self.debounce_interval_ms = debounce_interval_ms;
        self
    }

    pub fn with_load_more_threshold(mut self, load_more_threshold: f64) -> Self {
        self.load_more_threshold = wrap_virtualizer::coerce_non_negative(load_more_threshold);
        self
    }

    pub fn with_has_more_items(mut self, has_more_items: bool) -> Self {
        self.has_more_items = has_more_items;
        self
    }

    pub fn with_on_load_more(
        mut self,
        on_load_more: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_load_more = on_load_more.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_invalidate(
        mut self,
        on_invalidate: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_invalidate = on_invalidate.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.layout = self.layout.normalized();
        self.recycle_cap = self.recycle_cap.max(1);
        self.load_more_threshold = wrap_virtualizer::coerce_non_negative(self.load_more_threshold);
        self
    }
}

impl core::fmt::Debug for PanelOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PanelOptions")
            .field("layout", &self.layout)
            .field("overscan_rows", &self.overscan_rows)
            .field("buffer_rows", &self.buffer_rows)
            .field("recycle_cap", &self.recycle_cap)
            .field("throttle_interval_ms", &self.throttle_interval_ms)
            .field("debounce_interval_ms", &self.debounce_interval_ms)
            .field("load_more_threshold", &self.load_more_threshold)
            .field("has_more_items", &self.has_more_items)
            .field("on_load_more", &self.on_load_more.is_some())
            .field("on_invalidate", &self.on_invalidate.is_some())
            .finish()
    }
}
