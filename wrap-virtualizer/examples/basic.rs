// Example: layout math for a wrapping grid of one million items.
use wrap_virtualizer::{Direction, LayoutCalculator, LayoutOptions, navigation_target};

fn main() {
    let mut l = LayoutCalculator::new(LayoutOptions::new(180.0, 240.0).with_spacing(8.0, 12.0));
    let panel = l.recalculate(1_000_000, 1_280.0);
    println!("items_per_row={}", l.items_per_row());
    println!("rows={} panel={panel:?}", l.row_count());

    let visible = l.visible_range(123_456.0, 720.0, 2);
    println!("visible_range={visible:?}");
    if let Some(range) = visible {
        println!("first_rect={:?}", l.item_rect(range.start));
    }

    let down = navigation_target(Direction::Down, Some(10), 1_000_000, l.items_per_row(), false);
    println!("down from 10 => {down:?}");

    // Viewport shrinks: fewer columns, more rows.
    l.recalculate(1_000_000, 640.0);
    println!("after resize: {:?}", l.snapshot());
}
