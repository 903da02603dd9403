//! Viewport state for grid virtualization.
//!
//! Holds the scroll offset, container extent, item extent and buffer, and keeps
//! them inside the ranges the range resolver relies on. Unbounded containers
//! (a grid placed in an unconstrained parent) get a fallback extent.

use super::config::{ConfigError, GridConfig};

/// Maximum reasonable container extent before treating it as infinite.
const MAX_REASONABLE_CONTAINER: f32 = 100_000.0;

/// Number of items an unbounded container is assumed to show.
const INFINITE_CONTAINER_ITEM_COUNT: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    scroll_offset: f32,
    container_extent: f32,
    item_extent: f32,
    buffer: usize,
}

impl ViewportState {
    pub fn new(item_extent: f32, container_extent: f32, buffer: usize) -> Result<Self, ConfigError> {
        let config = GridConfig {
            item_extent,
            container_extent,
            buffer,
            ..GridConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut viewport = Self {
            scroll_offset: 0.0,
            container_extent: 0.0,
            item_extent: config.item_extent,
            buffer: config.buffer,
        };
        viewport.set_container_extent(config.container_extent);
        Ok(viewport)
    }

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    #[inline]
    pub fn container_extent(&self) -> f32 {
        self.container_extent
    }

    #[inline]
    pub fn item_extent(&self) -> f32 {
        self.item_extent
    }

    #[inline]
    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Sets the scroll offset, clamping negative and NaN values to zero.
    /// Returns the offset actually stored.
    pub fn set_scroll_offset(&mut self, offset: f32) -> f32 {
        self.scroll_offset = if offset.is_nan() { 0.0 } else { offset.max(0.0) };
        self.scroll_offset
    }

    /// Sets the container extent.
    ///
    /// Negative and NaN extents collapse to zero. Infinite or absurdly large
    /// extents are replaced by room for a fixed number of items.
    pub fn set_container_extent(&mut self, extent: f32) {
        self.container_extent = if extent.is_nan() || extent <= 0.0 {
            0.0
        } else if extent.is_infinite() || extent > MAX_REASONABLE_CONTAINER {
            let fallback = self.item_extent * INFINITE_CONTAINER_ITEM_COUNT;
            log::warn!(
                "Grid: Detected unbounded container extent ({extent}), using fallback {fallback}. \
                 Consider placing the grid in a constrained container."
            );
            fallback
        } else {
            extent
        };
    }

    /// Total extent of `len` items; the size of the scroll placeholder.
    pub fn content_extent(&self, len: usize) -> f32 {
        len as f32 * self.item_extent
    }

    /// Offset along the scroll axis at which item `index` starts.
    pub fn offset_of(&self, index: usize) -> f32 {
        index as f32 * self.item_extent
    }

    pub fn max_scroll_offset(&self, len: usize) -> f32 {
        (self.content_extent(len) - self.container_extent).max(0.0)
    }

    /// Pulls the scroll offset back inside the scrollable range for `len`
    /// items. Returns whether it moved.
    pub fn clamp_scroll_offset(&mut self, len: usize) -> bool {
        let max = self.max_scroll_offset(len);
        if self.scroll_offset > max {
            log::trace!("clamping scroll offset {} to {max}", self.scroll_offset);
            self.scroll_offset = max;
            true
        } else {
            false
        }
    }
}
