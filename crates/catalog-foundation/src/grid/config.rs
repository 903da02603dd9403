//! Grid configuration.

use std::fmt;

use web_time::Duration;

/// Default assumed extent of one catalog card along the scroll axis.
pub const DEFAULT_ITEM_EXTENT: f32 = 280.0;

/// Default viewport extent used until the host reports a real size.
pub const DEFAULT_CONTAINER_EXTENT: f32 = 800.0;

/// Default number of extra items rendered beyond each viewport edge.
pub const DEFAULT_BUFFER: usize = 5;

/// Collections longer than this are windowed.
pub const DEFAULT_THRESHOLD: usize = 100;

/// Configuration for a [`RenderCoordinator`](super::RenderCoordinator).
///
/// Every field has a default; use the `with_*` methods to override a few:
///
/// ```
/// use catalog_foundation::GridConfig;
///
/// let config = GridConfig::default().with_item_extent(320.0).with_buffer(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Uniform extent of one item along the scroll axis. Must be positive.
    pub item_extent: f32,

    /// Initial viewport extent along the scroll axis.
    pub container_extent: f32,

    /// Items rendered beyond each edge of the viewport in windowed mode.
    pub buffer: usize,

    /// Collections with more items than this are windowed.
    pub threshold: usize,

    /// Minimum spacing between scroll-driven recomputations.
    pub scroll_throttle: Duration,

    /// Quiet period after the last resize before layout is recomputed.
    pub resize_debounce: Duration,

    /// Quiet period after the last scroll before `is_scrolling` clears.
    pub scroll_idle: Duration,

    /// Look-ahead distance for promoting deferred views.
    pub visibility_margin: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_extent: DEFAULT_ITEM_EXTENT,
            container_extent: DEFAULT_CONTAINER_EXTENT,
            buffer: DEFAULT_BUFFER,
            threshold: DEFAULT_THRESHOLD,
            scroll_throttle: Duration::from_millis(16),
            resize_debounce: Duration::from_millis(150),
            scroll_idle: Duration::from_millis(150),
            visibility_margin: 200.0,
        }
    }
}

impl GridConfig {
    pub fn with_item_extent(mut self, item_extent: f32) -> Self {
        self.item_extent = item_extent;
        self
    }

    pub fn with_container_extent(mut self, container_extent: f32) -> Self {
        self.container_extent = container_extent;
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_scroll_throttle(mut self, interval: Duration) -> Self {
        self.scroll_throttle = interval;
        self
    }

    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce = delay;
        self
    }

    pub fn with_scroll_idle(mut self, delay: Duration) -> Self {
        self.scroll_idle = delay;
        self
    }

    pub fn with_visibility_margin(mut self, margin: f32) -> Self {
        self.visibility_margin = margin;
        self
    }

    /// Rejects settings that would make range arithmetic meaningless.
    ///
    /// Extents that are merely out of range (a negative container, a
    /// negative margin) are not errors; they are clamped when applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.item_extent.is_finite() {
            return Err(ConfigError::NonFiniteExtent {
                field: "item_extent",
                value: self.item_extent,
            });
        }
        if self.item_extent <= 0.0 {
            return Err(ConfigError::NonPositiveItemExtent {
                value: self.item_extent,
            });
        }
        if self.container_extent.is_nan() {
            return Err(ConfigError::NonFiniteExtent {
                field: "container_extent",
                value: self.container_extent,
            });
        }
        if !self.visibility_margin.is_finite() {
            return Err(ConfigError::NonFiniteExtent {
                field: "visibility_margin",
                value: self.visibility_margin,
            });
        }
        Ok(())
    }
}

/// A configuration value the grid cannot work with.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositiveItemExtent { value: f32 },
    NonFiniteExtent { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveItemExtent { value } => {
                write!(f, "item extent must be positive, got {value}")
            }
            ConfigError::NonFiniteExtent { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
