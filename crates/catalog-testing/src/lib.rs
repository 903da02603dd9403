//! Test support for the catalog grid.
//!
//! [`GridTestRule`] bundles a [`RenderCoordinator`](catalog_foundation::RenderCoordinator)
//! with a [`ManualClock`], a [`RecordingFactory`] and a [`RecordingSurface`] so
//! tests can drive scrolls, resizes and collection updates and then assert on
//! exactly what was built, disposed and committed.

mod factory;
mod fixtures;
mod rule;
mod surface;

pub use catalog_core::ManualClock;
pub use factory::{CardBuildError, CardView, FactoryEvent, FactoryProbe, RecordingFactory};
pub use fixtures::{models_with_ids, sample_models, ModelRecord};
pub use rule::{GridTestRule, TestGrid};
pub use surface::{CommittedBatch, RecordingSurface};
