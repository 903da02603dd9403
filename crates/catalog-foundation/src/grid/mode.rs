/// Rendering strategy for the current collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every item is materialized; scrolling never recomputes anything.
    Full,
    /// Only the resolved [`VisibleRange`](super::VisibleRange) is materialized.
    Windowed,
}

impl Mode {
    pub fn is_windowed(self) -> bool {
        self == Mode::Windowed
    }
}

/// Picks the strategy for a collection of `len` items.
///
/// Windowing kicks in strictly above `threshold`; a collection of exactly
/// `threshold` items is still rendered in full.
pub fn select_mode(len: usize, threshold: usize) -> Mode {
    if len > threshold {
        Mode::Windowed
    } else {
        Mode::Full
    }
}
