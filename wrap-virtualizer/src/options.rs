/// Default estimated item width.
pub const DEFAULT_ITEM_WIDTH: f64 = 200.0;
/// Default estimated item height.
pub const DEFAULT_ITEM_HEIGHT: f64 = 200.0;
/// Width used when neither the viewport nor the panel bounds report a usable width.
pub const DEFAULT_FALLBACK_WIDTH: f64 = 800.0;

/// Clamps a size value to `>= 1.0`. Non-finite values fall back to `default`.
pub fn coerce_positive(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        default.max(1.0)
    }
}

/// Clamps a spacing value to `>= 0.0`. Non-finite values become `0.0`.
pub fn coerce_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Sizing and spacing policy for [`crate::LayoutCalculator`].
///
/// Every field is coerced rather than rejected: sizes clamp to `>= 1`, spacing clamps to `>= 0`.
/// The calculator always produces a renderable layout.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Item width in fixed mode, lower bound of the item width in adaptive mode.
    pub estimated_item_width: f64,
    /// Item height in fixed mode, lower bound of the item height in adaptive mode.
    pub estimated_item_height: f64,
    /// Space between two items of the same row.
    pub horizontal_spacing: f64,
    /// Space between two rows.
    pub vertical_spacing: f64,
    /// `true`: every item uses the estimated size.
    /// `false`: items use the largest size observed so far (adaptive sizing).
    pub use_fixed_item_size: bool,
    /// When set, the panel reports the full viewport width instead of the width of its content.
    pub fill_available_space: bool,
    /// Width substituted for a non-finite or non-positive viewport width.
    pub fallback_width: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            estimated_item_width: DEFAULT_ITEM_WIDTH,
            estimated_item_height: DEFAULT_ITEM_HEIGHT,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
            use_fixed_item_size: true,
            fill_available_space: true,
            fallback_width: DEFAULT_FALLBACK_WIDTH,
        }
    }
}

impl LayoutOptions {
    /// Creates options for items of the given estimated size.
    pub fn new(estimated_item_width: f64, estimated_item_height: f64) -> Self {
        Self::default().with_item_size(estimated_item_width, estimated_item_height)
    }

    pub fn with_item_size(mut self, width: f64, height: f64) -> Self {
        self.estimated_item_width = coerce_positive(width, DEFAULT_ITEM_WIDTH);
        self.estimated_item_height = coerce_positive(height, DEFAULT_ITEM_HEIGHT);
        self
    }

    pub fn with_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_spacing = coerce_non_negative(horizontal);
        self.vertical_spacing = coerce_non_negative(vertical);
        self
    }

    pub fn with_use_fixed_item_size(mut self, use_fixed_item_size: bool) -> Self {
        self.use_fixed_item_size = use_fixed_item_size;
        self
    }

    pub fn with_fill_available_space(mut self, fill_available_space: bool) -> Self {
        self.fill_available_space = fill_available_space;
        self
    }

    pub fn with_fallback_width(mut self, fallback_width: f64) -> Self {
        self.fallback_width = coerce_positive(fallback_width, DEFAULT_FALLBACK_WIDTH);
        self
    }

    /// Returns a copy with every field coerced into its valid domain.
    ///
    /// Fields are public, so values assigned directly bypass the `with_*` clamps; the calculator
    /// normalizes whatever it is handed.
    pub fn normalized(self) -> Self {
        Self {
            estimated_item_width: coerce_positive(self.estimated_item_width, DEFAULT_ITEM_WIDTH),
            estimated_item_height: coerce_positive(self.estimated_item_height, DEFAULT_ITEM_HEIGHT),
            horizontal_spacing: coerce_non_negative(self.horizontal_spacing),
            vertical_spacing: coerce_non_negative(self.vertical_spacing),
            use_fixed_item_size: self.use_fixed_item_size,
            fill_available_space: self.fill_available_space,
            fallback_width: coerce_positive(self.fallback_width, DEFAULT_FALLBACK_WIDTH),
        }
    }

    /// Whether switching from `self` to `other` changes item geometry.
    ///
    /// `fallback_width` is not part of the geometry: it only matters when the viewport is unknown.
    pub fn geometry_differs(&self, other: &LayoutOptions) -> bool {
        self.estimated_item_width != other.estimated_item_width
            || self.estimated_item_height != other.estimated_item_height
            || self.horizontal_spacing != other.horizontal_spacing
            || self.vertical_spacing != other.vertical_spacing
            || self.use_fixed_item_size != other.use_fixed_item_size
            || self.fill_available_space != other.fill_available_space
    }
}

impl core::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field(
                "estimated_item_size",
                &(self.estimated_item_width, self.estimated_item_height),
            )
            .field(
                "spacing",
                &(self.horizontal_spacing, self.vertical_spacing),
            )
            .field("use_fixed_item_size", &self.use_fixed_item_size)
            .field("fill_available_space", &self.fill_available_space)
            .field("fallback_width", &self.fallback_width)
            .finish()
    }
}
