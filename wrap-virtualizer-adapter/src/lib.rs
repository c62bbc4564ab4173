//! Panel runtime for the `wrap-virtualizer` crate.
//!
//! `wrap-virtualizer` holds the layout math. This crate turns it into a working virtualizing
//! panel without binding to any UI framework:
//!
//! - an element pool that realizes visible items and recycles off-screen ones,
//! - a viewport scheduler that throttles scrolling, debounces sizing changes and coalesces
//!   collection mutations,
//! - a [`PanelController`] that plugs into a host's measure/arrange protocol.
//!
//! The host supplies three capabilities through traits: an [`ItemSource`], an
//! [`ElementFactory`] and a [`TaskScheduler`]. [`ManualScheduler`] is a virtual-clock scheduler
//! for tests and simulations.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod host;
mod manual;
mod options;
mod pool;
mod scheduler;


pub use controller::{PanelController, PanelStats, PassOutcome};
pub use error::RealizeError;
pub use host::{
    CollectionChange, DeferredTask, ElementFactory, ItemSource, Priority, TaskScheduler, TimerKind,
};
pub use manual::ManualScheduler;
pub use options::{InvalidateCallback, LoadMoreCallback, PanelOptions};
pub use pool::{ElementPool, RealizeReport, RealizedElement};
pub use scheduler::{DebounceState, ThrottleState, ViewportDecision, ViewportScheduler};

pub use wrap_virtualizer::{
    Direction, IndexRange, LayoutOptions, LayoutSnapshot, Rect, Size, ViewportState,
};
