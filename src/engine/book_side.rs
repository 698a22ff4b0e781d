//! Book Side: a price-sorted collection of Price Levels for one side of the
//! book, Bids descending and Asks ascending, with O(log n) insert/erase and
//! O(1)/O(log n) best-price lookup.
//!
//! Backed by `crossbeam_skiplist::SkipMap<Price, Arc<Mutex<PriceLevel>>>`.
//! A hash map can't give priority iteration; what's needed is any ordered
//! map with logarithmic insert/erase and O(1)/O(log n) min-or-max —
//! `SkipMap` is precisely that, even though only one logical thread ever
//! touches it here. Because `SkipMap` hands back shared references to its
//! values, each level is wrapped in a `Mutex` so the single writer can still
//! get `&mut PriceLevel` through it.

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_skiplist::SkipMap;

use crate::types::{Price, Side};

/// One side (Bid or Ask) of the book.
pub struct BookSide {
    side: Side,
    levels: SkipMap<Price, Arc<Mutex<super::price_level::PriceLevel>>>,
}

impl BookSide {
    /// An empty side. `side` fixes the priority direction forever.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: SkipMap::new(),
        }
    }

    /// The best price on this side: highest for Bids, lowest for Asks.
    /// `None` if the side is empty.
    #[must_use]
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.iter().next_back().map(|e| *e.key()),
            Side::Ask => self.levels.iter().next().map(|e| *e.key()),
        }
    }

    /// The level at `price`, creating an empty one on first insertion.
    #[must_use]
    pub fn level_at(&self, price: Price) -> Arc<Mutex<super::price_level::PriceLevel>> {
        self.levels
            .get_or_insert(
                price,
                Arc::new(Mutex::new(super::price_level::PriceLevel::new(price))),
            )
            .value()
            .clone()
    }

    /// The level at `price` if one currently exists, without creating it.
    #[must_use]
    pub fn peek_level(&self, price: Price) -> Option<Arc<Mutex<super::price_level::PriceLevel>>> {
        self.levels.get(&price).map(|e| e.value().clone())
    }

    /// Remove the level at `price` if it has gone empty. A no-op if the
    /// level still holds quantity, or does not exist.
    pub fn drop_if_empty(&self, price: Price) {
        if let Some(entry) = self.levels.get(&price) {
            let empty = entry.value().lock().expect("price level mutex poisoned").is_empty();
            if empty {
                self.levels.remove(&price);
            }
        }
    }

    /// Whether this side currently has no resting quantity at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct price levels currently resting.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Iterate levels from best to worst priority. Restartable: each call
    /// produces a fresh iterator starting at the current best.
    pub fn iter_from_best(
        &self,
    ) -> Box<dyn Iterator<Item = (Price, Arc<Mutex<super::price_level::PriceLevel>>)> + '_> {
        match self.side {
            Side::Bid => Box::new(
                self.levels
                    .iter()
                    .rev()
                    .map(|e| (*e.key(), e.value().clone())),
            ),
            Side::Ask => Box::new(self.levels.iter().map(|e| (*e.key(), e.value().clone()))),
        }
    }

    /// Up to `k` `(price, total_quantity)` pairs in priority order, padded
    /// with `(0, 0)` sentinels if fewer than `k` levels exist.
    #[must_use]
    pub fn topk(&self, k: usize) -> Vec<(Price, u64)> {
        let mut out: Vec<(Price, u64)> = self
            .iter_from_best()
            .take(k)
            .map(|(price, level)| {
                let qty = level.lock().expect("price level mutex poisoned").total_quantity();
                (price, qty)
            })
            .collect();
        while out.len() < k {
            out.push((0, 0));
        }
        out
    }

    /// Total resting quantity across the whole side.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.levels
            .iter()
            .map(|e| e.value().lock().expect("price level mutex poisoned").total_quantity())
            .sum()
    }

    /// Convenience accessor used by invariant checks and `show()`.
    pub fn lock_level(
        level: &Arc<Mutex<super::price_level::PriceLevel>>,
    ) -> MutexGuard<'_, super::price_level::PriceLevel> {
        level.lock().expect("price level mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_side_best_price_is_highest() {
        let side = BookSide::new(Side::Bid);
        side.level_at(100).lock().unwrap().append(1, 5);
        side.level_at(105).lock().unwrap().append(2, 5);
        side.level_at(95).lock().unwrap().append(3, 5);
        assert_eq!(side.best_price(), Some(105));
    }

    #[test]
    fn ask_side_best_price_is_lowest() {
        let side = BookSide::new(Side::Ask);
        side.level_at(100).lock().unwrap().append(1, 5);
        side.level_at(95).lock().unwrap().append(2, 5);
        side.level_at(105).lock().unwrap().append(3, 5);
        assert_eq!(side.best_price(), Some(95));
    }

    #[test]
    fn empty_side_has_no_best_price() {
        let side = BookSide::new(Side::Bid);
        assert_eq!(side.best_price(), None);
    }

    #[test]
    fn drop_if_empty_removes_drained_levels() {
        let side = BookSide::new(Side::Bid);
        let level = side.level_at(100);
        let handle = level.lock().unwrap().append(1, 5);
        level.lock().unwrap().reduce(handle, 5).unwrap();
        side.drop_if_empty(100);
        assert!(side.peek_level(100).is_none());
    }

    #[test]
    fn topk_pads_with_sentinels() {
        let side = BookSide::new(Side::Bid);
        side.level_at(100).lock().unwrap().append(1, 5);
        let top = side.topk(3);
        assert_eq!(top, vec![(100, 5), (0, 0), (0, 0)]);
    }

    #[test]
    fn iter_from_best_is_restartable_and_ordered() {
        let side = BookSide::new(Side::Bid);
        side.level_at(100).lock().unwrap().append(1, 5);
        side.level_at(110).lock().unwrap().append(2, 5);
        let first: Vec<Price> = side.iter_from_best().map(|(p, _)| p).collect();
        let second: Vec<Price> = side.iter_from_best().map(|(p, _)| p).collect();
        assert_eq!(first, vec![110, 100]);
        assert_eq!(second, vec![110, 100]);
    }
}
