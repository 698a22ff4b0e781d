//! Ties one Book Side per side of the market together with the shared
//! Order Index, the unit both the continuous matcher and the call-auction
//! matcher operate on.

use crate::engine::book_side::BookSide;
use crate::engine::order_index::{Location, OrderIndex};
use crate::engine::price_level::Handle;
use crate::error::{EngineError, EngineResult};
use crate::types::{Price, Side};

/// The two-sided book plus the index that locates resting orders by uid.
pub struct Book {
    bids: BookSide,
    asks: BookSide,
    index: OrderIndex,
}

impl Book {
    /// An empty book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            index: OrderIndex::new(),
        }
    }

    /// The requested side.
    #[must_use]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Read-only access to the order index, for invariant checks.
    #[must_use]
    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    /// Rest `uid` at `price` on `side` with `quantity`, recording it in the
    /// Order Index.
    pub fn rest(&mut self, side: Side, price: Price, quantity: u64, uid: u64) {
        let level = self.side(side).level_at(price);
        let handle = super::book_side::BookSide::lock_level(&level).append(uid, quantity);
        self.index.insert(
            uid,
            Location {
                side,
                price,
                handle,
            },
        );
    }

    /// Reduce the resting order `uid` by `delta` (a match consuming part or
    /// all of it). Removes the level if it goes empty, and drops the Order
    /// Index entry if the order is fully drained.
    ///
    /// # Errors
    /// `UnknownOrder` if `uid` is not currently resting. `Underflow` if
    /// `delta` exceeds its remaining quantity.
    pub fn reduce(&mut self, uid: u64, delta: u64) -> EngineResult<()> {
        let Location { side, price, handle } = self
            .index
            .get(uid)
            .ok_or(EngineError::UnknownOrder(uid))?;
        let level = self
            .side(side)
            .peek_level(price)
            .ok_or(EngineError::UnknownOrder(uid))?;
        let drained = {
            let mut guard = super::book_side::BookSide::lock_level(&level);
            guard
                .reduce(handle, delta)
                .map_err(|e| promote_uid(e, uid))?
        };
        if drained {
            self.index.remove(uid);
        }
        self.side(side).drop_if_empty(price);
        Ok(())
    }

    /// Remove `uid` from the book entirely (a Cancel, or the replace half of
    /// a Modify). Fails with `UnknownOrder` if it is not currently resting.
    pub fn cancel(&mut self, uid: u64) -> EngineResult<()> {
        let Location { side, price, handle } = self
            .index
            .get(uid)
            .ok_or(EngineError::UnknownOrder(uid))?;
        let level = self
            .side(side)
            .peek_level(price)
            .ok_or(EngineError::UnknownOrder(uid))?;
        super::book_side::BookSide::lock_level(&level)
            .remove(handle)
            .map_err(|e| promote_uid(e, uid))?;
        self.index.remove(uid);
        self.side(side).drop_if_empty(price);
        Ok(())
    }

    /// The remaining quantity of `uid`, if it is resting.
    #[must_use]
    pub fn remaining(&self, uid: u64) -> Option<u64> {
        let Location { side, price, handle } = self.index.get(uid)?;
        let level = self.side(side).peek_level(price)?;
        super::book_side::BookSide::lock_level(&level).remaining(handle)
    }

    /// Whether any order currently rests on the book.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

/// `PriceLevel` doesn't know the uid of a stale handle; the caller here
/// already looked it up via the Order Index, so attach it to the error.
fn promote_uid(err: EngineError, uid: u64) -> EngineError {
    match err {
        EngineError::NotFound(_) => EngineError::UnknownOrder(uid),
        EngineError::Underflow { delta, remaining, .. } => {
            EngineError::Underflow { uid, delta, remaining }
        }
        other => other,
    }
}
