use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wrap_virtualizer_adapter::{
    CollectionChange, ElementFactory, LayoutOptions, ManualScheduler, PanelController,
    PanelOptions, Size, ViewportState,
};

/// A stand-in for real UI widgets: a visual is just a label.
#[derive(Default)]
struct Labels {
    live: usize,
}

impl ElementFactory for Labels {
    type Item = String;
    type Visual = String;
    type Error = std::convert::Infallible;

    fn create_for(&mut self, item: &String, index: usize) -> Result<String, Self::Error> {
        self.live += 1;
        Ok(format!("#{index} {item}"))
    }

    fn prepare(&mut self, _visual: &mut String, _item: &String, _index: usize) {}

    fn destroy(&mut self, _visual: String) {
        self.live -= 1;
    }
}

fn main() {
    // Example: an infinite photo gallery driven on a virtual clock.
    //
    // A real host would forward scroll events, run posted tasks on its UI loop and fire timers
    // with its own clock; `ManualScheduler` + `advance_to` simulate all three.
    let wants_more = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&wants_more);
    let options = PanelOptions::new(LayoutOptions::new(160.0, 120.0).with_spacing(8.0, 8.0))
        .with_on_load_more(Some(move || flag.store(true, Ordering::SeqCst)));

    let photos: Vec<String> = (0..60).map(|i| format!("photo-{i:03}.jpg")).collect();
    let mut panel = PanelController::new(photos, Labels::default(), ManualScheduler::new(), options);

    let desired = panel.measure(Size::new(1_024.0, 768.0));
    println!("desired={desired:?}");

    let mut now_ms = 0u64;
    for step in 0..40u64 {
        now_ms += 4;
        panel.advance_to(now_ms);
        panel.on_viewport_changed(ViewportState::new(step as f64 * 40.0, 768.0, 1_024.0), now_ms);

        if wants_more.swap(false, Ordering::SeqCst) {
            let start = panel.source().len();
            panel
                .source_mut()
                .extend((start..start + 30).map(|i| format!("photo-{i:03}.jpg")));
            panel.on_collection_changed(CollectionChange::Insert {
                index: start,
                count: 30,
            });
            println!("t={now_ms} loaded more: count={}", panel.item_count());
        }
    }
    panel.advance_to(now_ms + 100);

    let first = panel.realized_elements().next().map(|(i, v)| (i, v.clone()));
    println!(
        "pooled={} live={} first={first:?}",
        panel.pool().len(),
        panel.factory().live
    );
    println!("stats={:?}", panel.stats());
}
