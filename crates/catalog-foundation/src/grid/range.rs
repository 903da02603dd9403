//! Visible range resolution.

use std::ops::RangeInclusive;

use super::viewport::ViewportState;

/// Inclusive index interval of the items that are materialized.
///
/// Always satisfies `start <= end`; an empty collection has no range at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    /// The range covering every index of a `len`-item collection.
    pub fn covering(len: usize) -> Option<Self> {
        len.checked_sub(1).map(|end| Self { start: 0, end })
    }

    /// Number of indices in the range.
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Maps the viewport onto the window of indices that must be materialized.
///
/// ```text
/// visible_count = ceil(container / item) + 2 * buffer
/// start         = max(0, floor(offset / item) - buffer)
/// end           = min(len - 1, start + visible_count)
/// ```
///
/// `start` is additionally capped at `len - 1`, so an offset left over from a
/// longer collection still yields a valid range. Returns `None` for an empty
/// collection. Cheap enough to run on every frame.
pub fn resolve_range(viewport: &ViewportState, len: usize) -> Option<VisibleRange> {
    let last = len.checked_sub(1)?;
    let item_extent = viewport.item_extent();

    let visible_count = ((viewport.container_extent() / item_extent).ceil() as usize)
        .saturating_add(viewport.buffer().saturating_mul(2));
    let first_visible = (viewport.scroll_offset() / item_extent).floor() as usize;

    let start = first_visible.saturating_sub(viewport.buffer()).min(last);
    let end = start.saturating_add(visible_count).min(last);
    Some(VisibleRange { start, end })
}
