//! Core data model: orders, trades, ticks, and session intervals.

use serde::{Deserialize, Serialize};

/// Which side of the book an order or resting level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side.
    Bid,
    /// Sell side.
    Ask,
}

impl Side {
    /// The opposite side, against which an aggressive order of this side matches.
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "B"),
            Side::Ask => write!(f, "S"),
        }
    }
}

/// The kind of event carried by an [`Order`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Rests on the book at `price` until filled or cancelled.
    Limit,
    /// Executes immediately against the opposite side; any remainder is discarded.
    Market,
    /// Removes `target_uid` from the book. No trades.
    Cancel,
    /// Cancel `target_uid`, then insert a fresh `Limit` at the new price/quantity
    /// with this event's timestamp (always loses time priority — see DESIGN.md).
    Modify,
}

/// A scaled fixed-point price. Exact integer arithmetic only — no floating
/// point tolerance is ever applied to price equality or ordering.
pub type Price = i64;

/// One event in the input stream: a new order, a cancel, or a modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Globally unique identifier assigned by the submitter.
    pub uid: u64,
    /// Side of the book this order (or its target) belongs to.
    pub side: Side,
    /// What kind of event this is.
    pub kind: OrderKind,
    /// Limit price, scaled integer. Meaningful only for `Limit`.
    pub price: Price,
    /// Quantity in shares. Non-negative; meaningless for `Cancel`.
    pub quantity: u64,
    /// Monotonically non-decreasing nanoseconds since epoch.
    pub timestamp: i64,
    /// The order being amended, for `Cancel`/`Modify`.
    pub target_uid: Option<u64>,
}

impl Order {
    /// Construct a resting `Limit` order.
    #[must_use]
    pub fn limit(uid: u64, side: Side, price: Price, quantity: u64, timestamp: i64) -> Self {
        Self {
            uid,
            side,
            kind: OrderKind::Limit,
            price,
            quantity,
            timestamp,
            target_uid: None,
        }
    }

    /// Construct a `Market` order (no meaningful price).
    #[must_use]
    pub fn market(uid: u64, side: Side, quantity: u64, timestamp: i64) -> Self {
        Self {
            uid,
            side,
            kind: OrderKind::Market,
            price: 0,
            quantity,
            timestamp,
            target_uid: None,
        }
    }

    /// Construct a `Cancel` targeting `target_uid`.
    #[must_use]
    pub fn cancel(uid: u64, side: Side, target_uid: u64, timestamp: i64) -> Self {
        Self {
            uid,
            side,
            kind: OrderKind::Cancel,
            price: 0,
            quantity: 0,
            timestamp,
            target_uid: Some(target_uid),
        }
    }

    /// Construct a `Modify` of `target_uid` to a new price/quantity.
    #[must_use]
    pub fn modify(
        uid: u64,
        side: Side,
        target_uid: u64,
        price: Price,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            uid,
            side,
            kind: OrderKind::Modify,
            price,
            quantity,
            timestamp,
            target_uid: Some(target_uid),
        }
    }
}

/// One execution produced by the continuous matcher or the call-auction matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Resting or aggressive bid-side order identifier.
    pub bid_uid: u64,
    /// Resting or aggressive ask-side order identifier.
    pub ask_uid: u64,
    /// Execution price. For continuous trading this is the passive order's
    /// price; for a call auction it is the single clearing price.
    pub price: Price,
    /// Quantity executed.
    pub quantity: u64,
    /// Timestamp of the aggressive event that produced the execution, or
    /// the call auction's close time.
    pub timestamp: i64,
}

/// A trading status in effect over a [`SessionInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Orders accumulate; no continuous matching; resolved by an implicit
    /// `match_call_auction()` at the interval's end.
    CallAuction,
    /// Event-by-event double-auction matching.
    ContinuousTrading,
    /// No status-backed interval covers the cursor; events queue but do not apply.
    Closed,
}

/// A non-overlapping slice of the trading calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInterval {
    /// The status in effect for `[start_ns, end_ns)`.
    pub status: SessionStatus,
    /// Inclusive start, nanoseconds since epoch (or since session open).
    pub start_ns: i64,
    /// Exclusive end, nanoseconds since epoch (or since session open).
    pub end_ns: i64,
}

impl SessionInterval {
    /// Whether `ts` falls within `[start_ns, end_ns)`.
    #[must_use]
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start_ns && ts < self.end_ns
    }
}

/// A periodic OHLCV + top-k depth market-data snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Nanosecond timestamp of this tick's deadline.
    pub timestamp: i64,
    /// First trade price in the window, or the previous close if none traded.
    pub open: Price,
    /// Highest trade price in the window, or the previous close if none traded.
    pub high: Price,
    /// Lowest trade price in the window, or the previous close if none traded.
    pub low: Price,
    /// Last trade price in the window, or the previous close if none traded.
    pub close: Price,
    /// Sum of trade quantities in the window.
    pub volume: u64,
    /// Sum of `price * quantity` over the window, as an exact scaled integer.
    pub amount: i128,
    /// Bid prices, best first, padded with `0` past the book's depth.
    pub bid_prices: Vec<Price>,
    /// Bid quantities, aligned with `bid_prices`, padded with `0`.
    pub bid_volumes: Vec<u64>,
    /// Ask prices, best first, padded with `0` past the book's depth.
    pub ask_prices: Vec<Price>,
    /// Ask quantities, aligned with `ask_prices`, padded with `0`.
    pub ask_volumes: Vec<u64>,
}
