use crate::Direction;

/// Result of a navigation query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationTarget {
    /// The target is the starting element itself.
    Unchanged,
    /// Move to this index.
    Index(usize),
    /// No valid target (empty collection).
    None,
}

/// Computes the index reached from `from` by moving in `direction`.
///
/// `from = None` behaves as "before the first item": `Next` lands on index 0.
/// `Up`/`Down` move by a full row. With `wrap`, out-of-range targets wrap around the collection;
/// without it they clamp to the first or last item. A target equal to `from` is
/// [`NavigationTarget::Unchanged`].
pub fn navigation_target(
    direction: Direction,
    from: Option<usize>,
    count: usize,
    items_per_row: usize,
    wrap: bool,
) -> NavigationTarget {
    if count == 0 {
        return NavigationTarget::None;
    }

    let count = count as i64;
    let from = from.map_or(-1, |i| i as i64);
    // A saturated column count (huge viewport) must not wrap into a negative step.
    let per_row = i64::try_from(items_per_row.max(1)).unwrap_or(i64::MAX);
    let to = match direction {
        Direction::First => 0,
        Direction::Last => count - 1,
        Direction::Next | Direction::Right => from + 1,
        Direction::Previous | Direction::Left => from - 1,
        Direction::Up => from.saturating_sub(per_row),
        Direction::Down => from.saturating_add(per_row),
    };

    let to = if wrap {
        to.rem_euclid(count)
    } else {
        to.clamp(0, count - 1)
    };
    if to == from {
        return NavigationTarget::Unchanged;
    }
    NavigationTarget::Index(to as usize)
}
