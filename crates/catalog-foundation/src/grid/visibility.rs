//! Lazy visibility refinement.
//!
//! Works like an intersection observer with a root margin: views that were
//! built deferred are watched until their slot along the scroll axis first
//! overlaps the viewport widened by `margin` on both sides. At that point the
//! owner fills them in and stops watching them. This changes what a view
//! contains, never which items are materialized.

use std::fmt;
use std::hash::Hash;

use catalog_core::collections::map::HashSet;
use smallvec::SmallVec;

use super::viewport::ViewportState;

pub struct VisibilityTracker<Id> {
    observed: HashSet<Id>,
    margin: f32,
    connected: bool,
}

impl<Id: Clone + Eq + Hash> VisibilityTracker<Id> {
    pub fn new(margin: f32) -> Self {
        Self {
            observed: HashSet::default(),
            margin: margin.max(0.0),
            connected: true,
        }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Starts watching `id`. Ignored once disconnected.
    pub fn observe(&mut self, id: Id) {
        if self.connected {
            self.observed.insert(id);
        }
    }

    pub fn unobserve(&mut self, id: &Id) -> bool {
        self.observed.remove(id)
    }

    pub fn is_observed(&self, id: &Id) -> bool {
        self.observed.contains(id)
    }

    /// Stops watching every id that fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Id) -> bool) {
        self.observed.retain(|id| keep(id));
    }

    pub fn clear(&mut self) {
        self.observed.clear();
    }

    /// Stops watching everything for good.
    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Whether the slot of item `index` overlaps the widened viewport.
    pub fn intersects(&self, index: usize, viewport: &ViewportState) -> bool {
        let item_start = viewport.offset_of(index);
        let item_end = item_start + viewport.item_extent();
        let window_start = viewport.scroll_offset() - self.margin;
        let window_end = viewport.scroll_offset() + viewport.container_extent() + self.margin;
        item_start < window_end && item_end > window_start
    }

    /// Observed ids among `entries` that are now in view.
    pub fn intersecting(
        &self,
        entries: impl IntoIterator<Item = (usize, Id)>,
        viewport: &ViewportState,
    ) -> SmallVec<[Id; 8]> {
        entries
            .into_iter()
            .filter(|(index, id)| self.observed.contains(id) && self.intersects(*index, viewport))
            .map(|(_, id)| id)
            .collect()
    }
}

impl<Id> fmt::Debug for VisibilityTracker<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityTracker")
            .field("observed", &self.observed.len())
            .field("margin", &self.margin)
            .field("connected", &self.connected)
            .finish()
    }
}
