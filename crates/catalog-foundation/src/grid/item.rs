//! Item and view factory contracts.
//!
//! The grid never looks inside an item beyond its id, and never builds a view
//! itself. Both are supplied by the caller through the traits below.

use std::fmt::Debug;
use std::hash::Hash;

/// A record that can be shown in the grid.
pub trait CatalogItem {
    /// Stable identity. Used to recognize an item across scrolls and
    /// collection updates so its view can be reused.
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}

/// Builds and releases the views shown for catalog items.
pub trait ViewFactory {
    type Item: CatalogItem;

    /// The live view. Owned by the grid's view cache until disposed.
    type Handle;

    type Error: std::error::Error + 'static;

    /// Builds a view for `item`. Called at most once per item per cache miss.
    ///
    /// A failure only affects this item: it is reported, not cached, and the
    /// rest of the batch is still built.
    fn create(&mut self, item: &Self::Item) -> Result<Self::Handle, Self::Error>;

    /// Releases everything `handle` owns.
    fn dispose(&mut self, handle: Self::Handle);

    /// Whether `handle` was built as a lightweight placeholder whose content
    /// should be filled in once it scrolls into view.
    fn is_deferred(&self, handle: &Self::Handle) -> bool {
        let _ = handle;
        false
    }

    /// Fills in a deferred view. Called once, the first time it intersects
    /// the viewport plus the look-ahead margin.
    fn populate(&mut self, handle: &mut Self::Handle) {
        let _ = handle;
    }
}

/// Id type of the items a factory builds views for.
pub type ItemId<F> = <<F as ViewFactory>::Item as CatalogItem>::Id;
