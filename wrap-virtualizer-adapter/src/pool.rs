use alloc::collections::BTreeMap;
use alloc::string::ToString;
use alloc::vec::Vec;

use wrap_virtualizer::{IndexRange, LayoutCalculator, Rect};

use crate::{ElementFactory, ItemSource, RealizeError};

/// A live visual bound to one item index, plus its last computed geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct RealizedElement<V> {
    pub visual: V,
    pub rect: Rect,
}

/// Outcome of [`ElementPool::realize`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealizeReport {
    /// Indexes that got a new visual.
    pub created: usize,
    /// Already pooled indexes whose geometry was rewritten in place.
    pub updated: usize,
    /// Indexes skipped this pass.
    pub failures: Vec<RealizeError>,
}

/// Index-keyed arena of realized elements.
///
/// There is at most one element per index, and the pool exclusively owns every pooled visual until
/// it is handed back through [`ElementFactory::destroy`]. Visuals never reference the data side:
/// the index is the only link.
#[derive(Clone, Debug)]
pub struct ElementPool<V> {
    elements: BTreeMap<usize, RealizedElement<V>>,
    scratch: Vec<(usize, usize)>,
}

impl<V> Default for ElementPool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ElementPool<V> {
    pub fn new() -> Self {
        Self {
            elements: BTreeMap::new(),
            scratch: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.elements.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.elements.get(&index).map(|e| &e.visual)
    }

    pub fn element(&self, index: usize) -> Option<&RealizedElement<V>> {
        self.elements.get(&index)
    }

    /// Geometry of a pooled index; `None` when nothing is pooled there.
    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.elements.get(&index).map(|e| e.rect)
    }

    /// Pooled indexes in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.keys().copied()
    }

    /// Pooled elements in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RealizedElement<V>)> {
        self.elements.iter().map(|(&i, e)| (i, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut RealizedElement<V>)> {
        self.elements.iter_mut().map(|(&i, e)| (i, e))
    }

    /// Reverse lookup by visual. O(pooled).
    pub fn index_of(&self, visual: &V) -> Option<usize>
    where
        V: PartialEq,
    {
        self.elements
            .iter()
            .find(|(_, e)| &e.visual == visual)
            .map(|(&i, _)| i)
    }

    /// Makes every index of `range` pooled with up-to-date geometry.
    ///
    /// New indexes get a visual from the factory; pooled ones only have their geometry rewritten,
    /// the visual is kept as is. Indexes at or past the item count are rejected. Failures are
    /// logged, reported and skipped; they never stop the pass.
    pub fn realize<S, F>(
        &mut self,
        range: IndexRange,
        layout: &LayoutCalculator,
        source: &S,
        factory: &mut F,
    ) -> RealizeReport
    where
        S: ItemSource + ?Sized,
        F: ElementFactory<Item = S::Item, Visual = V>,
    {
        let mut report = RealizeReport::default();
        let count = source.count();

        for index in range.iter() {
            if index >= count {
                vwarn!(index, count, "ElementPool: realize past the end of the collection");
                report
                    .failures
                    .push(RealizeError::OutOfRange { index, count });
                // Every following index is out of range too.
                break;
            }

            let rect = layout.item_rect(index);
            if let Some(element) = self.elements.get_mut(&index) {
                element.rect = rect;
                report.updated += 1;
                continue;
            }

            let Some(item) = source.get(index) else {
                vwarn!(index, "ElementPool: item source has no item");
                report.failures.push(RealizeError::MissingItem { index });
                continue;
            };

            match factory.create_for(item, index) {
                Ok(mut visual) => {
                    factory.prepare(&mut visual, item, index);
                    self.elements
                        .insert(index, RealizedElement { visual, rect });
                    report.created += 1;
                }
                Err(err) => {
                    let message = err.to_string();
                    vwarn!(index, error = %message, "ElementPool: factory failed");
                    report
                        .failures
                        .push(RealizeError::Factory { index, message });
                }
            }
        }

        vtrace!(
            start = range.start,
            end = range.end,
            created = report.created,
            updated = report.updated,
            failed = report.failures.len(),
            "ElementPool::realize"
        );
        report
    }

    /// Recycles pooled elements outside the keep-window, at most `cap` of them.
    ///
    /// The keep-window is `visible` widened by `buffer_rows` full rows on each side. Indexes at or
    /// past `item_count` are always candidates. Candidates farthest from the window go first; the
    /// remainder is left for the next call. Returns the number of recycled elements.
    pub fn recycle_out_of_range<F>(
        &mut self,
        visible: Option<IndexRange>,
        buffer_rows: usize,
        items_per_row: usize,
        item_count: usize,
        cap: usize,
        factory: &mut F,
    ) -> usize
    where
        F: ElementFactory<Visual = V> + ?Sized,
    {
        let margin = buffer_rows.saturating_mul(items_per_row.max(1));
        let keep = visible.and_then(|v| v.expand(margin, item_count));

        self.scratch.clear();
        for &index in self.elements.keys() {
            let distance = match keep {
                _ if index >= item_count => usize::MAX,
                Some(keep) => keep.distance_to(index),
                None => usize::MAX,
            };
            if distance > 0 {
                self.scratch.push((distance, index));
            }
        }
        if self.scratch.is_empty() {
            return 0;
        }

        // Farthest first; ties by index for a stable order.
        self.scratch
            .sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        let take = self.scratch.len().min(cap);
        for &(_, index) in &self.scratch[..take] {
            if let Some(element) = self.elements.remove(&index) {
                factory.destroy(element.visual);
            }
        }

        vtrace!(
            recycled = take,
            remaining = self.scratch.len() - take,
            "ElementPool::recycle_out_of_range"
        );
        take
    }

    /// Releases every pooled element. Returns how many were released.
    pub fn recycle_all<F>(&mut self, factory: &mut F) -> usize
    where
        F: ElementFactory<Visual = V> + ?Sized,
    {
        let released = self.elements.len();
        for (_, element) in core::mem::take(&mut self.elements) {
            factory.destroy(element.visual);
        }
        if released > 0 {
            vdebug!(released, "ElementPool::recycle_all");
        }
        released
    }

    /// Rewrites the geometry of every pooled element below `item_count`, without creating or
    /// destroying anything. Returns how many elements were updated.
    pub fn update_all_in_place(&mut self, layout: &LayoutCalculator, item_count: usize) -> usize {
        let mut updated = 0;
        for (&index, element) in self.elements.range_mut(..item_count) {
            element.rect = layout.item_rect(index);
            updated += 1;
        }
        updated
    }
}
