//! Price Level: an insertion-ordered FIFO queue of orders resting at one
//! `(side, price)`, with O(1) head access, tail append, and removal by handle.
//!
//! Orders live in an arena (`Vec<Option<Slot>>`) linked into a doubly linked
//! list by index, the single-threaded counterpart to a `DashMap`-keyed-by-id
//! + `SegQueue`-of-ids hybrid: one writer needs no concurrent map, just
//! stable integer handles so the Order Index can find a resting order
//! without scanning the level.

use crate::error::{EngineError, EngineResult};
use crate::types::Price;

/// A stable handle to one resting order within its `PriceLevel`. Opaque to
/// callers outside this crate; the Order Index stores these alongside
/// `(side, price)` to locate an order in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

struct Slot {
    uid: u64,
    remaining: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// All resting orders at one price, on one side.
pub struct PriceLevel {
    price: Price,
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    total_quantity: u64,
}

/// A live order as seen by `peek_head`.
#[derive(Debug, Clone, Copy)]
pub struct HeadOrder {
    /// Handle usable with `remove`/`reduce`.
    pub handle: Handle,
    /// The resting order's identifier.
    pub uid: u64,
    /// Quantity still resting.
    pub remaining: u64,
}

impl PriceLevel {
    /// Create an empty level at `price`.
    #[must_use]
    pub fn new(price: Price) -> Self {
        Self {
            price,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            total_quantity: 0,
        }
    }

    /// The price this level is keyed at.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Sum of remaining quantity across every live order at this level.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Whether this level has no live orders left; callers should drop it
    /// from the Book Side once this is true.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_quantity == 0
    }

    /// Push `uid` with `quantity` to the tail of the FIFO.
    pub fn append(&mut self, uid: u64, quantity: u64) -> Handle {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        self.slots[idx] = Some(Slot {
            uid,
            remaining: quantity,
            prev: self.tail,
            next: None,
        });
        if let Some(tail) = self.tail {
            if let Some(slot) = self.slots[tail].as_mut() {
                slot.next = Some(idx);
            }
        } else {
            self.head = Some(idx);
        }
        self.tail = Some(idx);
        self.total_quantity += quantity;
        Handle(idx)
    }

    /// The earliest resting order, if any. Does not remove it — a fully
    /// drained head must be removed via `remove`/`reduce` before the next
    /// `peek_head` call observes it again.
    #[must_use]
    pub fn peek_head(&self) -> Option<HeadOrder> {
        let idx = self.head?;
        let slot = self.slots[idx].as_ref()?;
        Some(HeadOrder {
            handle: Handle(idx),
            uid: slot.uid,
            remaining: slot.remaining,
        })
    }

    fn unlink(&mut self, idx: usize, quantity_still_present: u64) {
        let (prev, next) = {
            let slot = self.slots[idx].as_ref().expect("unlink of live slot");
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slots[p].as_mut().expect("prev live").next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].as_mut().expect("next live").prev = prev,
            None => self.tail = prev,
        }
        self.slots[idx] = None;
        self.free.push(idx);
        self.total_quantity -= quantity_still_present;
    }

    /// Unlink the order at `handle` entirely, regardless of remaining
    /// quantity. Fails with `NotFound` if the handle is stale (already
    /// removed).
    pub fn remove(&mut self, handle: Handle) -> EngineResult<()> {
        let idx = handle.0;
        let remaining = match self.slots.get(idx).and_then(|s| s.as_ref()) {
            Some(slot) => slot.remaining,
            None => return Err(EngineError::NotFound(0)),
        };
        self.unlink(idx, remaining);
        Ok(())
    }

    /// Subtract `delta` from the order's remaining quantity. If the result
    /// is zero the order is unlinked. Returns whether the order was fully
    /// drained (and thus removed).
    ///
    /// # Errors
    /// `Underflow` if `delta` exceeds the order's remaining quantity.
    /// `NotFound` if `handle` is stale.
    pub fn reduce(&mut self, handle: Handle, delta: u64) -> EngineResult<bool> {
        let idx = handle.0;
        let uid = match self.slots.get_mut(idx).and_then(|s| s.as_mut()) {
            Some(slot) => {
                if delta > slot.remaining {
                    return Err(EngineError::Underflow {
                        uid: slot.uid,
                        delta,
                        remaining: slot.remaining,
                    });
                }
                slot.remaining -= delta;
                slot.uid
            }
            None => return Err(EngineError::NotFound(0)),
        };
        self.total_quantity -= delta;
        let drained = self.slots[idx].as_ref().expect("just reduced").remaining == 0;
        if drained {
            let _ = uid;
            self.unlink(idx, 0);
        }
        Ok(drained)
    }

    /// Remaining quantity of the order at `handle`, if it is still live.
    #[must_use]
    pub fn remaining(&self, handle: Handle) -> Option<u64> {
        self.slots.get(handle.0).and_then(|s| s.as_ref()).map(|s| s.remaining)
    }

    /// Iterate live orders from the head in FIFO order. Used by invariant
    /// checks and `show()`; matching never needs more than the head.
    pub fn iter(&self) -> impl Iterator<Item = HeadOrder> + '_ {
        let mut cur = self.head;
        std::iter::from_fn(move || {
            let idx = cur?;
            let slot = self.slots[idx].as_ref().expect("linked slot is live");
            cur = slot.next;
            Some(HeadOrder {
                handle: Handle(idx),
                uid: slot.uid,
                remaining: slot.remaining,
            })
        })
    }
}
