//! Windowed rendering of catalog items.
//!
//! # Architecture
//!
//! - [`GridConfig`] - constructor configuration and its validation
//! - [`ViewportState`] - scroll offset, container extent, item extent, buffer
//! - [`resolve_range`] - viewport + collection size to a [`VisibleRange`]
//! - [`select_mode`] - [`Mode::Full`] or [`Mode::Windowed`] by collection size
//! - [`ViewCache`] - id-keyed live views, disposed through the factory
//! - [`VisibilityTracker`] - promotes deferred views once they come into view
//! - [`RenderCoordinator`] - owns all of the above and reacts to events

mod config;
mod coordinator;
mod error;
mod item;
mod mode;
mod range;
mod surface;
mod view_cache;
mod viewport;
mod visibility;

pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use item::*;
pub use mode::*;
pub use range::*;
pub use surface::*;
pub use view_cache::*;
pub use viewport::*;
pub use visibility::*;
