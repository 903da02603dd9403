use std::rc::Rc;
use std::time::Duration;

use catalog_core::ManualClock;
use catalog_foundation::{ConfigError, GridConfig, RenderCoordinator, RenderError};

use crate::factory::{FactoryProbe, RecordingFactory};
use crate::fixtures::ModelRecord;
use crate::surface::RecordingSurface;

pub type TestGrid = RenderCoordinator<RecordingFactory, RecordingSurface, ManualClock>;

/// Headless harness for exercising the grid in tests.
///
/// Owns a coordinator running on a [`ManualClock`], so throttled and debounced
/// work only happens when the test advances time. Every factory handed to the
/// grid through the rule reports into the same [`FactoryProbe`].
pub struct GridTestRule {
    grid: TestGrid,
    clock: ManualClock,
    probe: FactoryProbe,
}

impl GridTestRule {
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        let clock = ManualClock::new();
        let grid = RenderCoordinator::new(config, RecordingSurface::new(), clock.clone())?;
        Ok(Self {
            grid,
            clock,
            probe: FactoryProbe::new(),
        })
    }

    /// Shows `models` with a fresh recording factory.
    pub fn set_models(&mut self, models: Rc<[ModelRecord]>) -> Result<(), RenderError> {
        let factory = RecordingFactory::with_probe(self.probe.clone());
        self.grid.update_models(models, factory)
    }

    /// Shows `models` with a factory configured by `configure`.
    pub fn set_models_with(
        &mut self,
        models: Rc<[ModelRecord]>,
        configure: impl FnOnce(RecordingFactory) -> RecordingFactory,
    ) -> Result<(), RenderError> {
        let factory = configure(RecordingFactory::with_probe(self.probe.clone()));
        self.grid.update_models(models, factory)
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.grid.on_scroll(offset);
    }

    /// Moves time forward by `millis` and runs whatever became due.
    pub fn advance_time(&mut self, millis: u64) -> bool {
        self.clock.advance(Duration::from_millis(millis));
        self.grid.poll()
    }

    /// Advances time deadline by deadline until nothing is pending.
    pub fn settle(&mut self) {
        let mut rounds = 0;
        while let Some(wait) = self.grid.next_deadline() {
            rounds += 1;
            if rounds > 100 {
                panic!("settle looped too many times");
            }
            log::trace!("settle: waiting {wait:?}");
            self.clock.advance(wait);
            self.grid.poll();
        }
    }

    pub fn grid(&self) -> &TestGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut TestGrid {
        &mut self.grid
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn probe(&self) -> &FactoryProbe {
        &self.probe
    }

    pub fn surface(&self) -> &RecordingSurface {
        self.grid.surface()
    }
}
