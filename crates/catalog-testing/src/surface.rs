use catalog_foundation::{Mode, RenderBatch, RenderSurface, VisibleRange};

use crate::factory::CardView;

/// A committed batch, reduced to what tests assert on.
#[derive(Clone, Debug, PartialEq)]
pub struct CommittedBatch {
    pub mode: Mode,
    pub range: VisibleRange,
    pub translation: f32,
    pub indices: Vec<usize>,
    pub ids: Vec<u64>,
}

/// A surface that remembers everything it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commits: Vec<CommittedBatch>,
    pub content_extent: Option<f32>,
    pub scroll_requests: Vec<f32>,
    pub translation_resets: usize,
    pub loading_shown: usize,
    pub empty_shown: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_commit(&self) -> Option<&CommittedBatch> {
        self.commits.last()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }
}

impl RenderSurface<u64, CardView> for RecordingSurface {
    fn commit(&mut self, batch: &RenderBatch<'_, u64, CardView>) {
        self.commits.push(CommittedBatch {
            mode: batch.mode,
            range: batch.range,
            translation: batch.translation,
            indices: batch.entries.iter().map(|entry| entry.index).collect(),
            ids: batch.entries.iter().map(|entry| entry.handle.id).collect(),
        });
    }

    fn set_content_extent(&mut self, extent: f32) {
        self.content_extent = Some(extent);
    }

    fn smooth_scroll_to(&mut self, offset: f32) {
        self.scroll_requests.push(offset);
    }

    fn reset_translation(&mut self) {
        self.translation_resets += 1;
    }

    fn show_loading(&mut self) {
        self.loading_shown += 1;
    }

    fn show_empty(&mut self) {
        self.empty_shown += 1;
    }
}
