//! Virtualized grid rendering for large model catalogs.
//!
//! The [`grid`] module decides which slice of an ordered collection has to
//! exist as live views at any moment, builds and recycles those views through
//! a caller-supplied [`ViewFactory`], and tells a [`RenderSurface`] where to
//! put them. Small collections are rendered in full; collections larger than
//! the configured threshold are windowed around the scroll position.
//!
//! # Example
//!
//! ```
//! use catalog_foundation::{GridConfig, Mode, RenderCoordinator};
//! use catalog_runtime_std::StdClock;
//! use catalog_testing::{sample_models, RecordingFactory, RecordingSurface};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut grid = RenderCoordinator::new(GridConfig::default(), RecordingSurface::new(), StdClock)?;
//! grid.update_models(sample_models(500), RecordingFactory::new())?;
//! assert_eq!(grid.mode(), Some(Mode::Windowed));
//!
//! // From the host's event loop:
//! grid.on_scroll(2_800.0);
//! grid.poll();
//! assert_eq!(grid.visible_range().map(|range| range.start), Some(5));
//! # Ok(())
//! # }
//! ```

pub mod grid;

pub use grid::*;
