//! Hash collections shared by the catalog crates.
//!
//! Item ids are hashed on every recomputation, so the fast FxHash maps are the
//! default. The `std-hash` feature swaps in the standard library maps.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
}

use map::{HashMap, HashSet};

/// Creates a map with room for `capacity` entries using the configured hasher.
pub fn map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    HashMap::with_capacity_and_hasher(capacity, Default::default())
}

/// Creates a set with room for `capacity` entries using the configured hasher.
pub fn set_with_capacity<T>(capacity: usize) -> HashSet<T> {
    HashSet::with_capacity_and_hasher(capacity, Default::default())
}
