//! A headless wrap-layout virtualization engine.
//!
//! For the element pool, viewport scheduling and the panel controller, see the
//! `wrap-virtualizer-adapter` crate.
//!
//! This crate holds the math needed to show huge collections laid out in wrapping rows at
//! interactive frame rates: a row index cache with O(1) offset → row lookup, a layout calculator
//! with fixed and adaptive sizing policies, and keyboard-navigation target computation.
//!
//! It is UI-agnostic. A GUI/TUI layer is expected to provide:
//! - the viewport (top offset, height, width)
//! - the item count
//! - item size estimates and spacing
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod layout;
mod navigation;
mod options;
mod rows;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use layout::LayoutCalculator;
pub use navigation::{NavigationTarget, navigation_target};
pub use options::{
    DEFAULT_FALLBACK_WIDTH, DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, LayoutOptions,
    coerce_non_negative, coerce_positive,
};
pub use rows::RowIndexCache;
pub use state::{LayoutSnapshot, ViewportState};
pub use types::{Direction, IndexRange, Rect, RowInfo, Size};
