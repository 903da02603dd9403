//! The rendering surface the grid commits to.

use super::mode::Mode;
use super::range::VisibleRange;

/// What the surface is currently showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Presentation {
    /// Nothing yet; no collection has been supplied.
    #[default]
    Blank,
    Loading,
    /// The collection is empty.
    Empty,
    Items,
}

/// One materialized item in a [`RenderBatch`].
#[derive(Debug)]
pub struct BatchEntry<'a, Id, H> {
    pub index: usize,
    pub id: Id,
    pub handle: &'a H,
}

/// The ordered set of views to show after a recomputation.
#[derive(Debug)]
pub struct RenderBatch<'a, Id, H> {
    pub mode: Mode,
    pub range: VisibleRange,
    /// Offset along the scroll axis at which the first entry must be placed.
    /// `0` in full mode, `range.start * item_extent` in windowed mode.
    pub translation: f32,
    /// Entries in collection order. Items whose view failed to build are
    /// missing.
    pub entries: Vec<BatchEntry<'a, Id, H>>,
}

/// Host side of the grid: the scroll container and whatever draws into it.
pub trait RenderSurface<Id, H> {
    /// Replaces the rendered views with `batch`.
    fn commit(&mut self, batch: &RenderBatch<'_, Id, H>);

    /// Sizes the scroll placeholder so the native scroll range covers the
    /// whole collection.
    fn set_content_extent(&mut self, extent: f32);

    /// Requests an animated scroll to `offset`.
    fn smooth_scroll_to(&mut self, offset: f32);

    /// Drops any translation left over from windowed rendering.
    fn reset_translation(&mut self) {}

    fn show_loading(&mut self) {}

    fn show_empty(&mut self) {}
}
