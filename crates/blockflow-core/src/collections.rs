//! Hash collections used for traversal bookkeeping.
//!
//! Block ids are small dense integers, so the fast non-cryptographic hasher
//! is the default. Enable `std-hash` to fall back to SipHash.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
}

/// Visited set for guarded walks over `next` and `branches`.
pub type BlockSet = map::HashSet<crate::BlockId>;
