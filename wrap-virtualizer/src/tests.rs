use crate::*;

use alloc::vec::Vec;
use proptest::prelude::*;

fn layout(item_w: f64, item_h: f64) -> LayoutCalculator {
    LayoutCalculator::new(LayoutOptions::new(item_w, item_h))
}

fn assert_partition(rows: &[RowInfo], item_count: usize) {
    let mut next = 0usize;
    for row in rows {
        assert_eq!(row.start_index, next, "gap or overlap at row {row:?}");
        assert!(row.end_index >= row.start_index);
        next = row.end_index + 1;
    }
    assert_eq!(next, item_count);
}

#[test]
fn scenario_a_rows_and_visible_range() {
    let mut cache = RowIndexCache::new();
    cache.rebuild(23, 5, 70.0);
    assert_eq!(cache.row_count(), 5);
    assert_eq!(
        cache.row(4),
        Some(&RowInfo {
            top: 280.0,
            start_index: 20,
            end_index: 22
        })
    );

    // top=0, height=210, row pitch 70 => rows 0..=2.
    assert_eq!(cache.visible_range(0.0, 210.0), Some(IndexRange::new(0, 14)));
}

#[test]
fn scenario_a_through_the_calculator() {
    // 5 columns of 100 in a 500 wide viewport, 70 high rows.
    let mut l = layout(100.0, 70.0);
    let panel = l.recalculate(23, 500.0);
    assert_eq!(l.items_per_row(), 5);
    assert_eq!(l.row_count(), 5);
    assert_eq!(panel, Size::new(500.0, 350.0));
    assert_eq!(l.visible_range(0.0, 210.0, 0), Some(IndexRange::new(0, 14)));
    // One overscan row below (rows 0..=3); the top is already clamped.
    assert_eq!(l.visible_range(0.0, 210.0, 1), Some(IndexRange::new(0, 19)));
}

#[test]
fn scenario_b_empty_collection() {
    let mut l = layout(100.0, 70.0);
    let panel = l.recalculate(0, 500.0);
    assert_eq!(panel, Size::ZERO);
    assert_eq!(l.row_count(), 0);
    assert!(l.rows().is_empty());
    assert_eq!(l.visible_range(0.0, 1000.0, 2), None);
    assert!(l.is_valid());
    assert!(l.items_per_row() >= 1);
}

#[test]
fn items_per_row_accounts_for_spacing() {
    // (500 + 10) / (100 + 10) = 4.63 => 4 columns.
    let mut l = LayoutCalculator::new(LayoutOptions::new(100.0, 50.0).with_spacing(10.0, 5.0));
    l.recalculate(10, 500.0);
    assert_eq!(l.items_per_row(), 4);
    assert_eq!(l.row_count(), 3);
    assert_eq!(l.panel_size().height, 3.0 * 55.0);

    // (520 + 10) / 110 = 4.81 => still 4; (540 + 10) / 110 = 5 => 5.
    l.recalculate(10, 540.0);
    assert_eq!(l.items_per_row(), 5);
}

#[test]
fn items_per_row_never_drops_below_one() {
    let mut l = layout(300.0, 10.0);
    l.recalculate(4, 100.0);
    assert_eq!(l.items_per_row(), 1);
    assert_eq!(l.row_count(), 4);
}

#[test]
fn content_width_when_not_filling() {
    let mut l = LayoutCalculator::new(
        LayoutOptions::new(100.0, 50.0)
            .with_spacing(10.0, 0.0)
            .with_fill_available_space(false),
    );
    // 4 columns fit, but only 3 items: 3 * 100 + 2 * 10.
    let panel = l.recalculate(3, 500.0);
    assert_eq!(panel.width, 320.0);

    let panel = l.recalculate(9, 500.0);
    assert_eq!(panel.width, 4.0 * 100.0 + 3.0 * 10.0);
}

#[test]
fn degenerate_viewport_width_uses_fallback() {
    let mut l = LayoutCalculator::new(LayoutOptions::new(100.0, 50.0).with_fallback_width(400.0));
    for width in [0.0, -20.0, f64::NAN, f64::INFINITY] {
        let panel = l.recalculate(10, width);
        assert_eq!(l.items_per_row(), 4, "width={width}");
        assert_eq!(panel.width, 400.0);
        assert_eq!(l.cached_viewport_width(), 400.0);
    }
}

#[test]
fn options_are_coerced() {
    let o = LayoutOptions::new(0.0, -5.0).with_spacing(-1.0, f64::NAN);
    assert_eq!(o.estimated_item_width, 1.0);
    assert_eq!(o.estimated_item_height, 1.0);
    assert_eq!(o.horizontal_spacing, 0.0);
    assert_eq!(o.vertical_spacing, 0.0);

    let raw = LayoutOptions {
        estimated_item_width: f64::NAN,
        fallback_width: -1.0,
        ..LayoutOptions::default()
    };
    let l = LayoutCalculator::new(raw);
    assert_eq!(l.options().estimated_item_width, DEFAULT_ITEM_WIDTH);
    assert_eq!(l.options().fallback_width, 1.0);
}

#[test]
fn policy_changes_invalidate_the_cache() {
    let mut l = layout(100.0, 50.0);
    l.recalculate(10, 500.0);
    assert!(l.is_valid());
    assert!(!l.needs_recalculate(10));
    assert!(l.needs_recalculate(11));

    // Same value: nothing changes.
    assert!(!l.set_estimated_item_size(100.0, 50.0));
    assert!(l.is_valid());

    assert!(l.set_spacing(4.0, 0.0));
    assert!(!l.is_valid());
    l.recalculate(10, 500.0);

    assert!(l.set_use_fixed_item_size(false));
    assert!(!l.is_valid());
    l.recalculate(10, 500.0);

    assert!(l.set_fill_available_space(false));
    assert!(!l.is_valid());

    // The fallback width is not geometry.
    l.recalculate(10, 500.0);
    assert!(!l.update_options(|o| o.fallback_width = 1234.0));
    assert!(l.is_valid());
}

#[test]
fn adaptive_sizing_tracks_high_water_mark() {
    let mut l = LayoutCalculator::new(
        LayoutOptions::new(100.0, 50.0).with_use_fixed_item_size(false),
    );
    l.recalculate(10, 500.0);
    assert_eq!(l.measure_constraint(), None);

    assert!(l.observe_item_size(Size::new(120.0, 40.0)));
    assert!(!l.is_valid());
    assert_eq!(l.effective_item_size(), Size::new(120.0, 50.0));

    // Smaller sizes never lower the mark.
    assert!(!l.observe_item_size(Size::new(80.0, 30.0)));
    assert_eq!(l.effective_item_width(), 120.0);

    l.recalculate(10, 500.0);
    assert_eq!(l.items_per_row(), 4);

    // A new estimate resets the mark.
    l.set_estimated_item_size(60.0, 60.0);
    assert_eq!(l.effective_item_size(), Size::new(60.0, 60.0));
}

#[test]
fn fixed_sizing_ignores_observed_sizes() {
    let mut l = layout(100.0, 50.0);
    l.recalculate(10, 500.0);
    assert!(!l.observe_item_size(Size::new(500.0, 500.0)));
    assert!(l.is_valid());
    assert_eq!(l.effective_item_size(), Size::new(100.0, 50.0));
    assert_eq!(l.measure_constraint(), Some(Size::new(100.0, 50.0)));
}

#[test]
fn item_rect_follows_row_and_column() {
    let mut l = LayoutCalculator::new(LayoutOptions::new(100.0, 50.0).with_spacing(10.0, 5.0));
    l.recalculate(20, 500.0);
    assert_eq!(l.item_rect(0), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(l.item_rect(3), Rect::new(330.0, 0.0, 100.0, 50.0));
    assert_eq!(l.item_rect(4), Rect::new(0.0, 55.0, 100.0, 50.0));
    assert_eq!(l.item_rect(9), Rect::new(110.0, 110.0, 100.0, 50.0));
}

#[test]
fn row_lookup_clamps_offsets() {
    let mut cache = RowIndexCache::new();
    cache.rebuild(10, 3, 20.0);
    assert_eq!(cache.row_count(), 4);
    assert_eq!(cache.row_at_offset(-100.0), Some(0));
    assert_eq!(cache.row_at_offset(f64::NAN), Some(0));
    assert_eq!(cache.row_at_offset(39.9), Some(1));
    assert_eq!(cache.row_at_offset(40.0), Some(2));
    assert_eq!(cache.row_at_offset(1.0e12), Some(3));
    assert_eq!(cache.row_at_offset(f64::INFINITY), Some(3));

    // Bottom edges are exclusive.
    assert_eq!(cache.row_before_offset(40.0), Some(1));
    assert_eq!(cache.row_before_offset(40.5), Some(2));
    assert_eq!(cache.row_before_offset(0.0), Some(0));

    assert_eq!(cache.position_of(7), Some((2, 1)));
    assert_eq!(cache.position_of(10), None);
    assert_eq!(cache.last_index_before(1.0e9), Some(9));
}

#[test]
fn empty_cache_answers_nothing() {
    let mut cache = RowIndexCache::new();
    cache.rebuild(0, 4, 10.0);
    assert_eq!(cache.row_count(), 0);
    assert_eq!(cache.row_at_offset(0.0), None);
    assert_eq!(cache.first_index_at(0.0), None);
    assert_eq!(cache.visible_range(0.0, 100.0), None);
}

#[test]
fn row_buffer_grows_by_doubling_and_hides_stale_rows() {
    let mut cache = RowIndexCache::new();
    cache.rebuild(10, 1, 1.0);
    assert_eq!(cache.capacity(), 10);

    // 11 rows > 10 slots => max(11, 20).
    cache.rebuild(11, 1, 1.0);
    assert_eq!(cache.capacity(), 20);

    // Shrinking keeps the buffer but exposes only live rows.
    cache.rebuild(3, 1, 1.0);
    assert_eq!(cache.capacity(), 20);
    assert_eq!(cache.rows().len(), 3);
    assert_eq!(cache.row(3), None);
    assert_partition(cache.rows(), 3);

    cache.clear();
    assert_eq!(cache.row_count(), 0);
    assert_eq!(cache.capacity(), 20);
}

#[test]
fn reset_to_empty_zeroes_the_panel() {
    let mut l = layout(100.0, 50.0);
    l.recalculate(10, 500.0);
    l.reset_to_empty();
    assert_eq!(l.panel_size(), Size::ZERO);
    assert_eq!(l.row_count(), 0);
    assert!(!l.is_valid());
    assert_eq!(l.snapshot().cached_item_count, 0);
}

#[test]
fn snapshot_reflects_cache() {
    let mut l = layout(100.0, 50.0);
    l.recalculate(9, 300.0);
    assert_eq!(
        l.snapshot(),
        LayoutSnapshot {
            items_per_row: 3,
            row_count: 3,
            panel_size: Size::new(300.0, 150.0),
            cached_item_count: 9,
            cached_viewport_width: 300.0,
            valid: true,
        }
    );
}

#[test]
fn navigation_moves_by_rows_and_clamps() {
    use NavigationTarget::*;
    let nav = |d, from, wrap| navigation_target(d, from, 23, 5, wrap);

    assert_eq!(nav(Direction::First, Some(7), false), Index(0));
    assert_eq!(nav(Direction::Last, Some(7), false), Index(22));
    assert_eq!(nav(Direction::Next, Some(7), false), Index(8));
    assert_eq!(nav(Direction::Right, Some(7), false), Index(8));
    assert_eq!(nav(Direction::Previous, Some(7), false), Index(6));
    assert_eq!(nav(Direction::Left, Some(7), false), Index(6));
    assert_eq!(nav(Direction::Up, Some(7), false), Index(2));
    assert_eq!(nav(Direction::Down, Some(7), false), Index(12));

    assert_eq!(nav(Direction::First, Some(0), false), Unchanged);
    assert_eq!(nav(Direction::Up, Some(2), false), Index(0));
    assert_eq!(nav(Direction::Down, Some(20), false), Index(22));
    assert_eq!(nav(Direction::Previous, Some(0), false), Unchanged);
    assert_eq!(nav(Direction::Left, Some(0), false), Unchanged);
    assert_eq!(nav(Direction::Down, Some(22), false), Unchanged);
    assert_eq!(nav(Direction::Last, Some(22), false), Unchanged);
    assert_eq!(nav(Direction::Next, Option::None, false), Index(0));
    assert_eq!(nav(Direction::Up, Option::None, false), Index(0));
}

#[test]
fn navigation_survives_a_saturated_column_count() {
    use NavigationTarget::*;
    let mut l = layout(100.0, 70.0);
    l.recalculate(23, 1e300);
    assert_eq!(l.row_count(), 1);

    let per_row = l.items_per_row();
    assert_eq!(
        navigation_target(Direction::Down, Some(0), 23, per_row, false),
        Index(22)
    );
    assert_eq!(
        navigation_target(Direction::Up, Some(5), 23, per_row, false),
        Index(0)
    );
    for from in [0, 3, 22] {
        for direction in [Direction::Up, Direction::Down] {
            match navigation_target(direction, Some(from), 23, usize::MAX, true) {
                Index(to) => assert!(to < 23),
                Unchanged => {}
                None => panic!("wrapping navigation lost its target"),
            }
        }
    }
}

#[test]
fn navigation_wraps_with_euclidean_modulo() {
    use NavigationTarget::*;
    assert_eq!(
        navigation_target(Direction::Up, Some(2), 23, 5, true),
        Index(20)
    );
    assert_eq!(
        navigation_target(Direction::Down, Some(20), 23, 5, true),
        Index(2)
    );
    assert_eq!(
        navigation_target(Direction::Previous, Some(0), 23, 5, true),
        Index(22)
    );
    assert_eq!(
        navigation_target(Direction::Next, Some(0), 0, 5, true),
        None
    );
}

#[test]
fn viewport_readiness_and_width_tolerance() {
    assert!(ViewportState::new(0.0, 100.0, 200.0).is_ready());
    assert!(!ViewportState::new(-1.0, 100.0, 200.0).is_ready());
    assert!(!ViewportState::new(0.0, 0.0, 200.0).is_ready());
    assert!(!ViewportState::new(0.0, 100.0, f64::INFINITY).is_ready());

    let a = ViewportState::new(0.0, 100.0, 200.0);
    assert!(!a.width_differs(&ViewportState::new(50.0, 80.0, 200.9)));
    assert!(a.width_differs(&ViewportState::new(0.0, 100.0, 201.5)));
}

#[test]
fn index_range_expand_clamps_to_count() {
    let r = IndexRange::new(10, 14);
    assert_eq!(r.len(), 5);
    assert_eq!(r.expand(25, 23), Some(IndexRange::new(0, 22)));
    assert_eq!(r.expand(2, 100), Some(IndexRange::new(8, 16)));
    assert_eq!(r.expand(2, 0), None);
    assert_eq!(r.distance_to(3), 7);
    assert_eq!(r.distance_to(12), 0);
    assert_eq!(r.distance_to(20), 6);
    assert_eq!(r.iter().collect::<Vec<_>>(), [10, 11, 12, 13, 14]);
}

proptest! {
    #[test]
    fn rows_partition_all_items(item_count in 0usize..2_000, items_per_row in 1usize..64) {
        let mut cache = RowIndexCache::new();
        // Start from a larger layout so stale slots exist past `row_count`.
        cache.rebuild(item_count + 500, 1, 10.0);
        cache.rebuild(item_count, items_per_row, 10.0);

        prop_assert_eq!(cache.row_count(), item_count.div_ceil(items_per_row));
        assert_partition(cache.rows(), item_count);
        for (row, info) in cache.rows().iter().enumerate() {
            prop_assert_eq!(info.top, row as f64 * 10.0);
            prop_assert!(info.item_count() <= items_per_row);
        }
    }

    #[test]
    fn visible_range_stays_in_bounds(
        item_count in 1usize..1_000,
        viewport_width in 1.0f64..3_000.0,
        top in -500.0f64..50_000.0,
        height in 0.0f64..2_000.0,
        overscan in 0usize..4,
    ) {
        let mut l = layout(90.0, 40.0);
        l.recalculate(item_count, viewport_width);
        let range = l.visible_range(top, height, overscan).unwrap();
        prop_assert!(range.start <= range.end);
        prop_assert!(range.end < item_count);
        prop_assert_eq!(range.start % l.items_per_row(), 0);
    }
}
