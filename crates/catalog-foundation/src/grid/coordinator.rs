//! The render coordinator.
//!
//! Owns the viewport, the view cache, the visibility tracker and the rate
//! limiters, and turns host events into render batches. The host drives it
//! with explicit transition calls (`on_scroll`, `on_resize`, `apply_filters`,
//! ...) or the equivalent [`GridEvent`]s, and calls [`poll`] whenever
//! [`next_deadline`] elapses so throttled and debounced work can run.
//!
//! [`poll`]: RenderCoordinator::poll
//! [`next_deadline`]: RenderCoordinator::next_deadline

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use catalog_core::collections::set_with_capacity;
use catalog_core::{Clock, Debounce, RateLimit, Throttle};

use super::config::{ConfigError, GridConfig};
use super::error::{Diagnostic, RenderError};
use super::item::{CatalogItem, ItemId, ViewFactory};
use super::mode::{select_mode, Mode};
use super::range::{resolve_range, VisibleRange};
use super::surface::{BatchEntry, Presentation, RenderBatch, RenderSurface};
use super::view_cache::ViewCache;
use super::viewport::ViewportState;
use super::visibility::VisibilityTracker;

/// Lifecycle of a coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Created, no collection rendered yet.
    #[default]
    Idle,
    /// Recomputing mode and range and rebuilding the batch.
    Populating,
    /// The surface shows the current batch.
    Settled,
    /// Torn down. Terminal.
    Destroyed,
}

/// Counters describing the work the coordinator has done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Windowed range resolutions. Full mode never resolves a range.
    pub range_resolutions: u64,
    pub commits: u64,
    pub views_created: u64,
    /// Batch entries served from the cache instead of the factory.
    pub views_reused: u64,
    pub views_disposed: u64,
    /// Deferred views filled in after coming into view.
    pub views_promoted: u64,
    pub factory_failures: u64,
    pub mode_transitions: u64,
}

/// Host input, as a message.
pub enum GridEvent<T: CatalogItem> {
    Scroll(f32),
    Resize(f32),
    CollectionChanged(Rc<[T]>),
    ScrollToModel(T::Id),
    /// Run whatever rate-limited work is due.
    Tick,
}

impl<T: CatalogItem> fmt::Debug for GridEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridEvent::Scroll(offset) => f.debug_tuple("Scroll").field(offset).finish(),
            GridEvent::Resize(extent) => f.debug_tuple("Resize").field(extent).finish(),
            GridEvent::CollectionChanged(items) => f
                .debug_struct("CollectionChanged")
                .field("len", &items.len())
                .finish(),
            GridEvent::ScrollToModel(id) => f.debug_tuple("ScrollToModel").field(id).finish(),
            GridEvent::Tick => f.write_str("Tick"),
        }
    }
}

type DiagnosticHandler<Id> = Box<dyn FnMut(&Diagnostic<'_, Id>)>;

/// Decides which items exist as live views and commits them to a surface.
///
/// Collections of up to `threshold` items are rendered in full once and left
/// alone while scrolling. Larger collections are windowed: only the resolved
/// [`VisibleRange`] is materialized and the batch is translated to where the
/// range starts. Scroll recomputation is throttled, resize is debounced, and
/// `is_scrolling` stays set until scrolling has been quiet for `scroll_idle`.
pub struct RenderCoordinator<F, S, C>
where
    F: ViewFactory,
    S: RenderSurface<ItemId<F>, F::Handle>,
    C: Clock,
{
    config: GridConfig,
    viewport: ViewportState,
    collection: Rc<[F::Item]>,
    factory: Option<F>,
    surface: S,
    cache: ViewCache<ItemId<F>, F::Handle>,
    visibility: VisibilityTracker<ItemId<F>>,
    mode: Option<Mode>,
    range: Option<VisibleRange>,
    translation: f32,
    phase: Phase,
    presentation: Presentation,
    scroll_gate: Throttle<(), C>,
    resize_gate: Debounce<f32, C>,
    idle_gate: Debounce<(), C>,
    scrolling: bool,
    stats: RenderStats,
    diagnostics: Option<DiagnosticHandler<ItemId<F>>>,
}

impl<F, S, C> RenderCoordinator<F, S, C>
where
    F: ViewFactory,
    S: RenderSurface<ItemId<F>, F::Handle>,
    C: Clock,
{
    /// Creates an idle coordinator. Nothing is rendered until
    /// [`update_models`](Self::update_models).
    pub fn new(config: GridConfig, surface: S, clock: C) -> Result<Self, ConfigError>
    where
        C: Clone,
    {
        let viewport = ViewportState::from_config(&config)?;
        Ok(Self {
            scroll_gate: Throttle::new(clock.clone(), config.scroll_throttle),
            resize_gate: Debounce::new(clock.clone(), config.resize_debounce),
            idle_gate: Debounce::new(clock, config.scroll_idle),
            visibility: VisibilityTracker::new(config.visibility_margin),
            viewport,
            config,
            collection: Rc::from(Vec::new()),
            factory: None,
            surface,
            cache: ViewCache::new(),
            mode: None,
            range: None,
            translation: 0.0,
            phase: Phase::Idle,
            presentation: Presentation::Blank,
            scrolling: false,
            stats: RenderStats::default(),
            diagnostics: None,
        })
    }

    /// Replaces the collection and the factory that builds its views.
    ///
    /// Every view built by the previous factory is disposed by it first.
    pub fn update_models(
        &mut self,
        collection: impl Into<Rc<[F::Item]>>,
        factory: F,
    ) -> Result<(), RenderError> {
        self.ensure_alive()?;
        if let Some(mut previous) = self.factory.take() {
            self.stats.views_disposed += self.cache.clear(&mut previous) as u64;
        }
        self.visibility.clear();
        // The previous mode is kept so a mode change still resets the surface
        self.range = None;
        self.collection = collection.into();
        self.factory = Some(factory);
        log::debug!("grid: models updated, {} items", self.collection.len());
        self.populate();
        Ok(())
    }

    /// Replaces the shown collection, keeping the current factory.
    ///
    /// Views whose items are still shown are reused. Applying the same
    /// collection twice yields the same batch without building or disposing
    /// anything the second time.
    pub fn apply_filters(
        &mut self,
        collection: impl Into<Rc<[F::Item]>>,
    ) -> Result<(), RenderError> {
        self.ensure_alive()?;
        if self.factory.is_none() {
            return Err(RenderError::NoFactory);
        }
        self.collection = collection.into();
        log::debug!("grid: filters applied, {} items", self.collection.len());
        self.populate();
        Ok(())
    }

    pub fn on_collection_changed(
        &mut self,
        collection: impl Into<Rc<[F::Item]>>,
    ) -> Result<(), RenderError> {
        self.apply_filters(collection)
    }

    /// Asks the surface to scroll smoothly to the item with `id`.
    ///
    /// The first item with `id` wins. Returns `false` when no such item is
    /// shown.
    pub fn scroll_to_model(&mut self, id: &ItemId<F>) -> bool {
        if self.phase == Phase::Destroyed {
            return false;
        }
        match self.collection.iter().position(|item| item.id() == *id) {
            Some(index) => {
                let offset = self.viewport.offset_of(index);
                log::trace!("grid: scrolling to {id:?} at index {index}, offset {offset}");
                self.surface.smooth_scroll_to(offset);
                true
            }
            None => {
                log::debug!("grid: scroll_to_model ignored, {id:?} is not in the collection");
                false
            }
        }
    }

    pub fn show_loading(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.surface.show_loading();
        self.presentation = Presentation::Loading;
    }

    /// Records a new scroll position.
    ///
    /// In windowed mode the range is recomputed at most once per
    /// `scroll_throttle`; the trailing recomputation is delivered by
    /// [`poll`](Self::poll). Full mode never recomputes on scroll.
    pub fn on_scroll(&mut self, offset: f32) {
        if self.phase == Phase::Destroyed {
            log::trace!("grid: scroll after destroy ignored");
            return;
        }
        self.viewport.set_scroll_offset(offset);
        self.scrolling = true;
        self.idle_gate.call(());

        if self.mode == Some(Mode::Windowed) && self.scroll_gate.call(()).is_some() {
            self.populate();
        } else {
            self.refine_visibility();
        }
    }

    /// Records a new container extent. Applied once resizing goes quiet.
    pub fn on_resize(&mut self, container_extent: f32) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.resize_gate.call(container_extent);
    }

    /// Runs rate-limited work that is due. Returns whether anything ran.
    pub fn poll(&mut self) -> bool {
        if self.phase == Phase::Destroyed {
            return false;
        }
        let mut ran = false;

        if let Some(extent) = self.resize_gate.poll() {
            self.viewport.set_container_extent(extent);
            log::debug!(
                "grid: container resized to {}",
                self.viewport.container_extent()
            );
            // Full mode holds every view already
            if self.mode == Some(Mode::Windowed) {
                self.populate();
            } else {
                self.viewport.clamp_scroll_offset(self.collection.len());
                self.refine_visibility();
            }
            ran = true;
        }
        if self.scroll_gate.poll().is_some() {
            self.populate();
            ran = true;
        }
        if self.idle_gate.poll().is_some() {
            self.scrolling = false;
            ran = true;
        }
        ran
    }

    /// How long the host may wait before the next [`poll`](Self::poll) has
    /// work to do. `None` when nothing is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.resize_gate.remaining(),
            self.scroll_gate.remaining(),
            self.idle_gate.remaining(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn handle_event(&mut self, event: GridEvent<F::Item>) -> Result<(), RenderError> {
        self.ensure_alive()?;
        match event {
            GridEvent::Scroll(offset) => self.on_scroll(offset),
            GridEvent::Resize(extent) => self.on_resize(extent),
            GridEvent::CollectionChanged(collection) => self.apply_filters(collection)?,
            GridEvent::ScrollToModel(id) => {
                self.scroll_to_model(&id);
            }
            GridEvent::Tick => {
                self.poll();
            }
        }
        Ok(())
    }

    /// Installs a callback that receives every view build failure.
    pub fn set_diagnostic_handler(
        &mut self,
        handler: impl FnMut(&Diagnostic<'_, ItemId<F>>) + 'static,
    ) {
        self.diagnostics = Some(Box::new(handler));
    }

    /// Tears the grid down: pending work is dropped, every view is disposed
    /// and later events are ignored. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.scroll_gate.cancel();
        self.resize_gate.cancel();
        self.idle_gate.cancel();
        if let Some(mut factory) = self.factory.take() {
            self.stats.views_disposed += self.cache.clear(&mut factory) as u64;
        }
        self.visibility.disconnect();
        self.diagnostics = None;
        self.collection = Rc::from(Vec::new());
        self.mode = None;
        self.range = None;
        self.scrolling = false;
        self.phase = Phase::Destroyed;
        log::debug!("grid: destroyed");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.phase == Phase::Destroyed
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.range
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn collection(&self) -> &[F::Item] {
        &self.collection
    }

    /// Number of live views.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn view(&self, id: &ItemId<F>) -> Option<&F::Handle> {
        self.cache.get(id)
    }

    pub fn factory(&self) -> Option<&F> {
        self.factory.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Extent of the scroll placeholder: every item, whatever the mode.
    pub fn content_extent(&self) -> f32 {
        self.viewport.content_extent(self.collection.len())
    }

    /// Offset the current batch is placed at.
    pub fn translation(&self) -> f32 {
        self.translation
    }

    fn ensure_alive(&self) -> Result<(), RenderError> {
        if self.phase == Phase::Destroyed {
            Err(RenderError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Recomputes mode and range for the current collection and viewport,
    /// brings the cache in line and commits the batch.
    fn populate(&mut self) {
        let Some(factory) = self.factory.as_mut() else {
            return;
        };
        self.phase = Phase::Populating;
        let collection = Rc::clone(&self.collection);
        let len = collection.len();

        self.viewport.clamp_scroll_offset(len);
        self.surface
            .set_content_extent(self.viewport.content_extent(len));

        let mode = select_mode(len, self.config.threshold);
        if let Some(previous) = self.mode.filter(|previous| *previous != mode) {
            log::debug!("grid: mode {previous:?} -> {mode:?} at {len} items");
            self.stats.mode_transitions += 1;
            self.stats.views_disposed += self.cache.clear(factory) as u64;
            self.visibility.clear();
            self.translation = 0.0;
            self.surface.reset_translation();
        }
        self.mode = Some(mode);

        let range = match mode {
            Mode::Full => VisibleRange::covering(len),
            Mode::Windowed => {
                self.stats.range_resolutions += 1;
                resolve_range(&self.viewport, len)
            }
        };
        let Some(range) = range else {
            self.stats.views_disposed += self.cache.clear(factory) as u64;
            self.visibility.clear();
            self.range = None;
            self.translation = 0.0;
            self.surface.show_empty();
            self.presentation = Presentation::Empty;
            self.phase = Phase::Settled;
            log::debug!("grid: collection is empty");
            return;
        };

        let shown = &collection[range.start..=range.end];
        let mut keep = set_with_capacity(shown.len());
        keep.extend(shown.iter().map(CatalogItem::id));
        self.stats.views_disposed += self.cache.retain(|id| keep.contains(id), factory) as u64;
        self.visibility.retain(|id| keep.contains(id));

        for (index, item) in range.indices().zip(shown) {
            let id = item.id();
            if self.cache.contains(&id) {
                self.stats.views_reused += 1;
                continue;
            }
            match factory.create(item) {
                Ok(handle) => {
                    self.stats.views_created += 1;
                    if factory.is_deferred(&handle) {
                        self.visibility.observe(id.clone());
                    }
                    if let Some(replaced) = self.cache.put(id, handle) {
                        factory.dispose(replaced);
                    }
                }
                Err(error) => {
                    self.stats.factory_failures += 1;
                    log::warn!("grid: failed to build view for {id:?} at index {index}: {error}");
                    if let Some(handler) = self.diagnostics.as_mut() {
                        handler(&Diagnostic {
                            index,
                            id: &id,
                            error: &error,
                        });
                    }
                }
            }
        }

        let translation = match mode {
            Mode::Full => 0.0,
            Mode::Windowed => self.viewport.offset_of(range.start),
        };
        let entries = range
            .indices()
            .zip(shown)
            .filter_map(|(index, item)| {
                let id = item.id();
                let handle = self.cache.get(&id)?;
                Some(BatchEntry { index, id, handle })
            })
            .collect();
        self.surface.commit(&RenderBatch {
            mode,
            range,
            translation,
            entries,
        });
        self.stats.commits += 1;

        self.range = Some(range);
        self.translation = translation;
        self.presentation = Presentation::Items;
        self.phase = Phase::Settled;
        log::trace!(
            "grid: committed {:?} {}..={} at {translation}",
            mode,
            range.start,
            range.end
        );

        self.refine_visibility();
    }

    /// Fills in deferred views that have come within the look-ahead margin.
    fn refine_visibility(&mut self) {
        if self.visibility.is_empty() {
            return;
        }
        let (Some(range), Some(factory)) = (self.range, self.factory.as_mut()) else {
            return;
        };
        let collection = &self.collection;
        let promoted = self.visibility.intersecting(
            range.indices().map(|index| (index, collection[index].id())),
            &self.viewport,
        );
        for id in promoted {
            // Duplicate ids share a handle that is filled in once
            if !self.visibility.unobserve(&id) {
                continue;
            }
            if let Some(handle) = self.cache.get_mut(&id) {
                factory.populate(handle);
                self.stats.views_promoted += 1;
            }
        }
    }
}

impl<F, S, C> Drop for RenderCoordinator<F, S, C>
where
    F: ViewFactory,
    S: RenderSurface<ItemId<F>, F::Handle>,
    C: Clock,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<F, S, C> fmt::Debug for RenderCoordinator<F, S, C>
where
    F: ViewFactory,
    S: RenderSurface<ItemId<F>, F::Handle>,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCoordinator")
            .field("phase", &self.phase)
            .field("mode", &self.mode)
            .field("range", &self.range)
            .field("items", &self.collection.len())
            .field("views", &self.cache.len())
            .field("viewport", &self.viewport)
            .field("stats", &self.stats)
            .finish()
    }
}
