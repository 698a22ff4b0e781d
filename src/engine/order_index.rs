//! Order Index: uid -> (side, price, handle), the map that lets Cancel and
//! Modify find a resting order without scanning every price level.
//!
//! A reference order book keeps this mapping in a `DashMap<Id, (u128, Side)>`
//! for concurrent multi-writer access. This engine has exactly one writer,
//! single-threaded and synchronous, so a plain `HashMap` gives the same O(1)
//! average lookup/removal with none of the concurrent map's overhead — see
//! DESIGN.md for the drop of `dashmap` from the dependency stack.

use std::collections::HashMap;

use crate::engine::price_level::Handle;
use crate::types::{Price, Side};

/// Where a live order currently rests.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    /// Which side's map it rests in.
    pub side: Side,
    /// The price level it rests at.
    pub price: Price,
    /// Its handle within that `PriceLevel`.
    pub handle: Handle,
}

/// Maps `uid -> Location` for every order currently resting on the book.
/// An entry exists iff the order is live.
#[derive(Default)]
pub struct OrderIndex {
    locations: HashMap<u64, Location>,
}

impl OrderIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `uid` now rests at `location`. Overwrites any prior entry
    /// (callers only do this after removing the old one, e.g. via Modify).
    pub fn insert(&mut self, uid: u64, location: Location) {
        self.locations.insert(uid, location);
    }

    /// Look up where `uid` currently rests, if it is live.
    #[must_use]
    pub fn get(&self, uid: u64) -> Option<Location> {
        self.locations.get(&uid).copied()
    }

    /// Drop the entry for `uid`. No-op if it was already absent.
    pub fn remove(&mut self, uid: u64) -> Option<Location> {
        self.locations.remove(&uid)
    }

    /// Whether `uid` currently resolves to a live resting order.
    #[must_use]
    pub fn contains(&self, uid: u64) -> bool {
        self.locations.contains_key(&uid)
    }

    /// Number of live resting orders tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether no orders are currently resting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
