#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width when it is usable for layout (finite and positive).
    pub fn usable_width(&self) -> Option<f64> {
        (self.width.is_finite() && self.width > 0.0).then_some(self.width)
    }

    /// Returns the height when it is usable for layout (finite and positive).
    pub fn usable_height(&self) -> Option<f64> {
        (self.height.is_finite() && self.height > 0.0).then_some(self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// An inclusive range of item indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start: usize,
    pub end: usize, // inclusive
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "IndexRange: start > end ({start} > {end})");
        Self { start, end }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Widens the range by `margin` indexes on both sides, clamped to `[0, count)`.
    ///
    /// Returns `None` when `count == 0`.
    pub fn expand(&self, margin: usize, count: usize) -> Option<IndexRange> {
        if count == 0 {
            return None;
        }
        let start = self.start.saturating_sub(margin).min(count - 1);
        let end = self.end.saturating_add(margin).min(count - 1);
        Some(IndexRange::new(start.min(end), end))
    }

    /// Distance (in indexes) from `index` to the nearest end of this range, `0` when inside.
    pub fn distance_to(&self, index: usize) -> usize {
        if index < self.start {
            self.start - index
        } else if index > self.end {
            index - self.end
        } else {
            0
        }
    }
}

/// One wrapped row of the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowInfo {
    /// Offset of the row from the top of the panel.
    pub top: f64,
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl RowInfo {
    pub fn range(&self) -> IndexRange {
        IndexRange::new(self.start_index, self.end_index)
    }

    pub fn item_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Keyboard navigation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    First,
    Last,
    Next,
    Previous,
    /// Same as [`Direction::Previous`] in a left-to-right wrap layout.
    Left,
    /// Same as [`Direction::Next`] in a left-to-right wrap layout.
    Right,
    Up,
    Down,
}
