use alloc::vec::Vec;

use crate::{IndexRange, RowInfo};

/// Row partition of `[0, item_count)` for a uniform row height.
///
/// Because every row has the same height, offset → row lookup is a division, not a search.
///
/// The backing buffer is reused across rebuilds and only grows (by doubling), so entries past
/// [`Self::row_count`] are stale leftovers from earlier layouts. They are never exposed.
#[derive(Clone, Debug, Default)]
pub struct RowIndexCache {
    rows: Vec<RowInfo>,
    row_count: usize,
    items_per_row: usize,
    item_count: usize,
    row_height: f64,
}

impl RowIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the row partition. O(row_count).
    ///
    /// `items_per_row` is clamped to `>= 1`. `row_height` is the full row pitch (item height plus
    /// vertical spacing).
    pub fn rebuild(&mut self, item_count: usize, items_per_row: usize, row_height: f64) {
        let per_row = items_per_row.max(1);
        let row_count = item_count.div_ceil(per_row);

        if self.rows.len() < row_count {
            let capacity = row_count.max(self.rows.len().saturating_mul(2));
            vtrace!(
                from = self.rows.len(),
                to = capacity,
                "RowIndexCache: growing row buffer"
            );
            self.rows.resize(capacity, RowInfo::default());
        }

        for (row, info) in self.rows[..row_count].iter_mut().enumerate() {
            let start_index = row * per_row;
            let end_index = (start_index + per_row - 1).min(item_count - 1);
            *info = RowInfo {
                top: row as f64 * row_height,
                start_index,
                end_index,
            };
        }

        self.row_count = row_count;
        self.items_per_row = per_row;
        self.item_count = item_count;
        self.row_height = row_height;
    }

    /// Forgets the current partition while keeping the allocated buffer.
    pub fn clear(&mut self) {
        self.row_count = 0;
        self.item_count = 0;
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn items_per_row(&self) -> usize {
        self.items_per_row
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Number of allocated row slots (may exceed `row_count`).
    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    /// The live rows, exactly `row_count` entries.
    pub fn rows(&self) -> &[RowInfo] {
        &self.rows[..self.row_count]
    }

    pub fn row(&self, row: usize) -> Option<&RowInfo> {
        self.rows().get(row)
    }

    /// Maps an item index to `(row, column)`.
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.item_count {
            return None;
        }
        Some((index / self.items_per_row, index % self.items_per_row))
    }

    /// Returns the row containing `offset`, clamped to `[0, row_count - 1]`.
    ///
    /// Negative offsets clamp to row 0.
    pub fn row_at_offset(&self, offset: f64) -> Option<usize> {
        if self.row_count == 0 {
            return None;
        }
        Some(self.clamp_row(self.raw_row(offset)))
    }

    /// Returns the last row with any pixel above `bottom` (exclusive), clamped like
    /// [`Self::row_at_offset`].
    pub fn row_before_offset(&self, bottom: f64) -> Option<usize> {
        if self.row_count == 0 {
            return None;
        }
        let row = self.raw_row(bottom);
        let on_boundary = row > 0 && bottom.is_finite() && row as f64 * self.row_height == bottom;
        Some(self.clamp_row(if on_boundary { row - 1 } else { row }))
    }

    /// First item index of the row containing `top`.
    pub fn first_index_at(&self, top: f64) -> Option<usize> {
        let row = self.row_at_offset(top)?;
        Some(self.rows[row].start_index)
    }

    /// Last item index of the last row starting above `bottom`.
    pub fn last_index_before(&self, bottom: f64) -> Option<usize> {
        let row = self.row_before_offset(bottom)?;
        Some(self.rows[row].end_index.min(self.item_count - 1))
    }

    /// Item indexes of every row intersecting `[top, bottom)`.
    ///
    /// Returns `None` when the cache holds no rows.
    pub fn visible_range(&self, top: f64, bottom: f64) -> Option<IndexRange> {
        let first = self.row_at_offset(top)?;
        // An empty window still covers the row at `top`.
        let last = self.row_before_offset(bottom)?.max(first);
        Some(IndexRange::new(
            self.rows[first].start_index,
            self.rows[last].end_index,
        ))
    }

    fn raw_row(&self, offset: f64) -> usize {
        if offset.is_nan() || offset <= 0.0 || self.row_height <= 0.0 {
            return 0;
        }
        // Float → int casts saturate, so +inf maps to usize::MAX and is clamped by the caller.
        (offset / self.row_height) as usize
    }

    fn clamp_row(&self, row: usize) -> usize {
        row.min(self.row_count - 1)
    }
}
