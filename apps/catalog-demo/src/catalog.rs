//! Synthetic model catalog and a text-mode surface for the demo.

use std::fmt;
use std::rc::Rc;

use catalog_foundation::{CatalogItem, Mode, RenderBatch, RenderSurface, ViewFactory};

const FAMILIES: [&str; 6] = ["llama", "mistral", "phi", "qwen", "gemma", "falcon"];
const SIZES: [&str; 4] = ["1b", "7b", "13b", "70b"];

#[derive(Clone, Debug)]
pub struct ModelListing {
    pub id: u32,
    pub name: String,
    pub downloads: u32,
}

impl CatalogItem for ModelListing {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

pub fn build_catalog(count: u32) -> Rc<[ModelListing]> {
    (0..count)
        .map(|id| {
            let family = FAMILIES[id as usize % FAMILIES.len()];
            let size = SIZES[(id as usize / FAMILIES.len()) % SIZES.len()];
            ModelListing {
                id,
                name: format!("{family}-{size}-v{}", id / 24),
                downloads: id.wrapping_mul(2_654_435_761) % 1_000_000,
            }
        })
        .collect()
}

/// Listings whose name contains `query`, in catalog order.
pub fn filter_catalog(catalog: &[ModelListing], query: &str) -> Rc<[ModelListing]> {
    let query = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|listing| query.is_empty() || listing.name.contains(&query))
        .cloned()
        .collect()
}

pub struct Card {
    pub id: u32,
    pub headline: String,
    pub hydrated: bool,
}

#[derive(Debug)]
pub struct CardError(u32);

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing {} has no name", self.0)
    }
}

impl std::error::Error for CardError {}

/// Builds lightweight cards and hydrates them once they are about to show.
#[derive(Default)]
pub struct CardFactory {
    pub live: usize,
    pub hydrated: usize,
}

impl ViewFactory for CardFactory {
    type Item = ModelListing;
    type Handle = Card;
    type Error = CardError;

    fn create(&mut self, item: &ModelListing) -> Result<Card, CardError> {
        if item.name.is_empty() {
            return Err(CardError(item.id));
        }
        self.live += 1;
        Ok(Card {
            id: item.id,
            headline: item.name.clone(),
            hydrated: false,
        })
    }

    fn dispose(&mut self, _handle: Card) {
        self.live -= 1;
    }

    fn is_deferred(&self, handle: &Card) -> bool {
        !handle.hydrated
    }

    fn populate(&mut self, handle: &mut Card) {
        handle.hydrated = true;
        self.hydrated += 1;
    }
}

/// Logs what a real surface would draw.
#[derive(Default)]
pub struct LogSurface {
    pub commits: usize,
}

impl RenderSurface<u32, Card> for LogSurface {
    fn commit(&mut self, batch: &RenderBatch<'_, u32, Card>) {
        self.commits += 1;
        let first = batch
            .entries
            .first()
            .map(|entry| (entry.handle.id, entry.handle.headline.as_str()));
        let hydrated = batch
            .entries
            .iter()
            .filter(|entry| entry.handle.hydrated)
            .count();
        match batch.mode {
            Mode::Full => log::info!(
                "draw {} cards in full, first {:?}",
                batch.entries.len(),
                first
            ),
            Mode::Windowed => log::info!(
                "draw cards {}..={} at y={} ({} hydrated), first {:?}",
                batch.range.start,
                batch.range.end,
                batch.translation,
                hydrated,
                first
            ),
        }
    }

    fn set_content_extent(&mut self, extent: f32) {
        log::debug!("placeholder height {extent}");
    }

    fn smooth_scroll_to(&mut self, offset: f32) {
        log::info!("smooth scroll to y={offset}");
    }

    fn reset_translation(&mut self) {
        log::debug!("translation reset");
    }

    fn show_loading(&mut self) {
        log::info!("loading...");
    }

    fn show_empty(&mut self) {
        log::info!("no models match");
    }
}
