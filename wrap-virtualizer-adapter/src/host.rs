//! Host collaborator contracts.
//!
//! The panel never touches UI objects directly. Everything it needs from the hosting framework
//! goes through these traits: an indexed item source, an element factory that owns the visual
//! lifecycle, and a task scheduler for deferred work and timers.

use alloc::vec::Vec;
use core::ops::Range;

use wrap_virtualizer::{Rect, Size};

/// An ordered, indexable item sequence.
///
/// Identity is positional: two equal values at different indexes are different items. Mutations
/// are reported to the panel with [`crate::PanelController::on_collection_changed`].
pub trait ItemSource {
    type Item;

    fn count(&self) -> usize;

    fn get(&self, index: usize) -> Option<&Self::Item>;
}

impl<T> ItemSource for Vec<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

/// Creates, prepares and releases the visual element bound to an item.
///
/// While an element is pooled the panel owns its visual; [`Self::destroy`] hands it back.
pub trait ElementFactory {
    type Item: ?Sized;
    type Visual;
    type Error: core::fmt::Display;

    /// Creates a visual for `item` at `index`.
    ///
    /// A failure only skips this index for the current pass.
    fn create_for(&mut self, item: &Self::Item, index: usize) -> Result<Self::Visual, Self::Error>;

    /// Binds `item` to a freshly created visual.
    fn prepare(&mut self, visual: &mut Self::Visual, item: &Self::Item, index: usize);

    /// Releases a visual that left the pool.
    fn destroy(&mut self, visual: Self::Visual);

    /// Measures a pooled visual. `None` as constraint means "unconstrained".
    ///
    /// Returning a desired size feeds the adaptive sizing high-water mark.
    fn measure(&mut self, visual: &mut Self::Visual, constraint: Option<Size>) -> Option<Size> {
        let _ = (visual, constraint);
        None
    }

    /// Positions a pooled visual inside the panel.
    fn arrange(&mut self, visual: &mut Self::Visual, rect: Rect) {
        let _ = (visual, rect);
    }
}

/// Priority class of deferred work. Deferred tasks run FIFO within a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    Render,
    Background,
}

/// Work the panel posts to the host loop. The host hands it back through
/// [`crate::PanelController::run_deferred`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeferredTask {
    /// Full refresh after a collection mutation.
    Refresh,
    /// Raise the load-more notification.
    LoadMore,
    /// A pass requested while another one was running.
    FollowUp,
}

/// The two timers the panel drives. The host reports expirations through
/// [`crate::PanelController::on_timer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerKind {
    /// Repeating viewport-motion throttle.
    Throttle,
    /// One-shot sizing-policy debounce.
    Debounce,
}

/// Deferred-work and timer primitive of the host's single-threaded loop.
pub trait TaskScheduler {
    fn post_deferred(&mut self, priority: Priority, task: DeferredTask);

    /// Starts `timer`. Starting a running timer restarts it from now.
    fn start_timer(&mut self, timer: TimerKind, interval_ms: u64, repeating: bool);

    /// Stops `timer`. Stopping an idle timer is a no-op.
    fn stop_timer(&mut self, timer: TimerKind);
}

/// A mutation of the item source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionChange {
    Insert { index: usize, count: usize },
    Remove { index: usize, count: usize },
    Replace { index: usize, count: usize },
    Move { from: usize, to: usize, count: usize },
    Reset,
}

impl CollectionChange {
    /// Indexes touched by the change, `None` for a reset.
    pub fn affected_range(&self) -> Option<Range<usize>> {
        match *self {
            Self::Insert { index, count }
            | Self::Remove { index, count }
            | Self::Replace { index, count } => Some(index..index.saturating_add(count)),
            Self::Move { from, to, count } => {
                let start = from.min(to);
                let end = from.max(to).saturating_add(count);
                Some(start..end)
            }
            Self::Reset => None,
        }
    }
}
