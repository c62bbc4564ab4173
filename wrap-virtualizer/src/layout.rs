use crate::options::{DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, coerce_non_negative, coerce_positive};
use crate::{IndexRange, LayoutOptions, LayoutSnapshot, Rect, RowIndexCache, RowInfo, Size};

/// Wrap-layout calculator with a single coherent cache.
///
/// The cache (items per row, rows, panel size) is derived from the item count, the viewport width
/// and the sizing policy. Changing any of those marks it invalid; it must be recomputed with
/// [`Self::recalculate`] before being trusted again.
///
/// This type holds no UI objects. Callers drive it with plain numbers.
#[derive(Clone, Debug)]
pub struct LayoutCalculator {
    options: LayoutOptions,
    max_item_width: f64,
    max_item_height: f64,

    rows: RowIndexCache,
    items_per_row: usize,
    panel_size: Size,
    cached_item_count: usize,
    cached_viewport_width: f64,
    valid: bool,
}

impl Default for LayoutCalculator {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl LayoutCalculator {
    pub fn new(options: LayoutOptions) -> Self {
        let options = options.normalized();
        Self {
            max_item_width: options.estimated_item_width,
            max_item_height: options.estimated_item_height,
            options,
            rows: RowIndexCache::new(),
            items_per_row: 1,
            panel_size: Size::ZERO,
            cached_item_count: 0,
            cached_viewport_width: 0.0,
            valid: false,
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replaces the whole policy.
    ///
    /// Returns `true` when item geometry changed (the cache is then invalid). A changed estimate
    /// resets the adaptive high-water mark to the new estimate.
    pub fn set_options(&mut self, options: LayoutOptions) -> bool {
        let next = options.normalized();
        let prev = core::mem::replace(&mut self.options, next);
        if prev.estimated_item_width != next.estimated_item_width
            || prev.estimated_item_height != next.estimated_item_height
        {
            self.max_item_width = next.estimated_item_width;
            self.max_item_height = next.estimated_item_height;
        }
        let changed = prev.geometry_differs(&next);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut LayoutOptions)) -> bool {
        let mut next = self.options;
        f(&mut next);
        self.set_options(next)
    }

    pub fn set_estimated_item_size(&mut self, width: f64, height: f64) -> bool {
        self.update_options(|o| {
            o.estimated_item_width = coerce_positive(width, DEFAULT_ITEM_WIDTH);
            o.estimated_item_height = coerce_positive(height, DEFAULT_ITEM_HEIGHT);
        })
    }

    pub fn set_spacing(&mut self, horizontal: f64, vertical: f64) -> bool {
        self.update_options(|o| {
            o.horizontal_spacing = coerce_non_negative(horizontal);
            o.vertical_spacing = coerce_non_negative(vertical);
        })
    }

    pub fn set_use_fixed_item_size(&mut self, use_fixed_item_size: bool) -> bool {
        self.update_options(|o| o.use_fixed_item_size = use_fixed_item_size)
    }

    pub fn set_fill_available_space(&mut self, fill_available_space: bool) -> bool {
        self.update_options(|o| o.fill_available_space = fill_available_space)
    }

    /// Raises the adaptive high-water mark with a measured item size.
    ///
    /// Returns `true` when the effective item size changed (adaptive mode only); the cache is
    /// then invalid.
    pub fn observe_item_size(&mut self, size: Size) -> bool {
        let mut raised = false;
        if size.width.is_finite() && size.width > self.max_item_width {
            self.max_item_width = size.width;
            raised = true;
        }
        if size.height.is_finite() && size.height > self.max_item_height {
            self.max_item_height = size.height;
            raised = true;
        }
        let changed = raised && !self.options.use_fixed_item_size;
        if changed {
            vdebug!(
                width = self.max_item_width,
                height = self.max_item_height,
                "LayoutCalculator: adaptive item size raised"
            );
            self.invalidate();
        }
        changed
    }

    pub fn effective_item_width(&self) -> f64 {
        if self.options.use_fixed_item_size {
            self.options.estimated_item_width
        } else {
            self.max_item_width.max(self.options.estimated_item_width)
        }
    }

    pub fn effective_item_height(&self) -> f64 {
        if self.options.use_fixed_item_size {
            self.options.estimated_item_height
        } else {
            self.max_item_height.max(self.options.estimated_item_height)
        }
    }

    pub fn effective_item_size(&self) -> Size {
        Size::new(self.effective_item_width(), self.effective_item_height())
    }

    /// Horizontal pitch of one column (item width plus spacing).
    pub fn item_total_width(&self) -> f64 {
        self.effective_item_width() + self.options.horizontal_spacing
    }

    /// Vertical pitch of one row (item height plus spacing).
    pub fn item_total_height(&self) -> f64 {
        self.effective_item_height() + self.options.vertical_spacing
    }

    /// The constraint a realized element should be measured with: the item size in fixed mode,
    /// unconstrained (`None`) in adaptive mode.
    pub fn measure_constraint(&self) -> Option<Size> {
        self.options.use_fixed_item_size.then(|| {
            Size::new(
                self.options.estimated_item_width,
                self.options.estimated_item_height,
            )
        })
    }

    /// Substitutes the fallback width for a non-finite or non-positive viewport width.
    pub fn resolve_width(&self, viewport_width: f64) -> f64 {
        if viewport_width.is_finite() && viewport_width > 0.0 {
            viewport_width
        } else {
            self.options.fallback_width
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether the cache must be recomputed for this item count.
    pub fn needs_recalculate(&self, item_count: usize) -> bool {
        !self.valid || item_count != self.cached_item_count
    }

    /// Recomputes items per row, rows and panel size. O(row_count).
    pub fn recalculate(&mut self, item_count: usize, viewport_width: f64) -> Size {
        let viewport_width = self.resolve_width(viewport_width);
        let item_total_width = self.item_total_width();
        let item_total_height = self.item_total_height();

        // The cast truncates, which is `floor` for the non-negative quotient.
        let fit = (viewport_width + self.options.horizontal_spacing) / item_total_width;
        self.items_per_row = (fit as usize).max(1);
        self.rows
            .rebuild(item_count, self.items_per_row, item_total_height);

        let panel_height = self.rows.row_count() as f64 * item_total_height;
        let panel_width = if item_count == 0 {
            0.0
        } else if self.options.fill_available_space {
            viewport_width
        } else {
            self.content_width(item_count)
        };
        self.panel_size = Size::new(panel_width, panel_height);
        self.cached_item_count = item_count;
        self.cached_viewport_width = viewport_width;
        self.valid = true;

        vdebug!(
            item_count,
            viewport_width,
            items_per_row = self.items_per_row,
            row_count = self.rows.row_count(),
            "LayoutCalculator::recalculate"
        );
        self.panel_size
    }

    /// Resets the cache to the empty layout (no rows, zero panel) without touching the policy.
    pub fn reset_to_empty(&mut self) {
        self.rows.clear();
        self.panel_size = Size::ZERO;
        self.cached_item_count = 0;
        self.valid = false;
    }

    /// Width of the first row's actual content: `n` items plus `n - 1` gaps.
    pub fn content_width(&self, item_count: usize) -> f64 {
        if item_count == 0 {
            return 0.0;
        }
        let n = self.items_per_row.min(item_count);
        n as f64 * self.effective_item_width()
            + n.saturating_sub(1) as f64 * self.options.horizontal_spacing
    }

    pub fn items_per_row(&self) -> usize {
        self.items_per_row
    }

    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }

    pub fn rows(&self) -> &[RowInfo] {
        self.rows.rows()
    }

    pub fn panel_size(&self) -> Size {
        self.panel_size
    }

    pub fn cached_item_count(&self) -> usize {
        self.cached_item_count
    }

    pub fn cached_viewport_width(&self) -> f64 {
        self.cached_viewport_width
    }

    /// Geometry of the item at `index` for the current items-per-row and sizing policy.
    ///
    /// Positions follow `index / items_per_row` directly, so this is defined for any index; callers
    /// are expected to pass indexes below the item count.
    pub fn item_rect(&self, index: usize) -> Rect {
        let per_row = self.items_per_row.max(1);
        let (row, column) = (index / per_row, index % per_row);
        Rect::new(
            column as f64 * self.item_total_width(),
            row as f64 * self.item_total_height(),
            self.effective_item_width(),
            self.effective_item_height(),
        )
    }

    /// Indexes of the rows intersecting `[top, top + height)`, widened by `overscan_rows` rows on
    /// each side.
    ///
    /// Returns `None` when the layout holds no rows.
    pub fn visible_range(&self, top: f64, height: f64, overscan_rows: usize) -> Option<IndexRange> {
        let buffer = self.item_total_height() * overscan_rows as f64;
        self.rows.visible_range(top - buffer, top + height + buffer)
    }

    /// Captures the cache state (useful for diagnostics and tests).
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            items_per_row: self.items_per_row,
            row_count: self.rows.row_count(),
            panel_size: self.panel_size,
            cached_item_count: self.cached_item_count,
            cached_viewport_width: self.cached_viewport_width,
            valid: self.valid,
        }
    }
}
