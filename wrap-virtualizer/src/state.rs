use crate::Size;

/// The currently visible window of the panel.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub top: f64,
    pub height: f64,
    pub width: f64,
}

impl ViewportState {
    pub fn new(top: f64, height: f64, width: f64) -> Self {
        Self { top, height, width }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// A viewport is ready once the container is attached: a non-negative top and a finite,
    /// positive size.
    pub fn is_ready(&self) -> bool {
        let size = Size::new(self.width, self.height);
        self.top.is_finite()
            && self.top >= 0.0
            && size.usable_width().is_some()
            && size.usable_height().is_some()
    }

    /// Whether the width moved by more than one unit, which can change the column count.
    pub fn width_differs(&self, other: &ViewportState) -> bool {
        let delta = self.width - other.width;
        !(-1.0..=1.0).contains(&delta)
    }
}

/// A lightweight, serializable snapshot of the layout cache.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSnapshot {
    pub items_per_row: usize,
    pub row_count: usize,
    pub panel_size: Size,
    pub cached_item_count: usize,
    pub cached_viewport_width: f64,
    pub valid: bool,
}
