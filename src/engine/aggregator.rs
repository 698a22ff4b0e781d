//! Snapshot / Tick Aggregator: periodically captures top-of-book depth and
//! OHLCV summarizing the trades since the previous tick.

use crate::engine::book::Book;
use crate::types::{Price, Side, Tick, Trade};

/// Accumulates trades within the current tick window and emits a [`Tick`]
/// at each `start + n * snapshot_gap` deadline strictly inside the active
/// open interval.
#[derive(Debug, Clone)]
pub struct Aggregator {
    snapshot_gap: i64,
    topk: usize,

    previous_close: Price,
    interval_end: i64,
    next_deadline: Option<i64>,

    window_open: Price,
    window_high: Price,
    window_low: Price,
    window_close: Price,
    window_volume: u64,
    window_amount: i128,
    window_has_trade: bool,
}

impl Aggregator {
    /// `snapshot_gap` is nanoseconds between ticks; `topk` is the book-depth
    /// fan-out recorded on every tick.
    #[must_use]
    pub fn new(snapshot_gap: i64, topk: usize) -> Self {
        Self {
            snapshot_gap,
            topk,
            previous_close: 0,
            interval_end: i64::MIN,
            next_deadline: None,
            window_open: 0,
            window_high: 0,
            window_low: 0,
            window_close: 0,
            window_volume: 0,
            window_amount: 0,
            window_has_trade: false,
        }
    }

    /// Reconfigure the tick cadence. Takes effect from the next interval
    /// entered; the deadline grid already armed for the current interval is
    /// left alone so a mid-interval call doesn't retroactively shift ticks
    /// already scheduled.
    pub fn set_snapshot_gap(&mut self, ns: i64) {
        self.snapshot_gap = ns;
    }

    /// Reconfigure top-k depth captured on every future tick.
    pub fn set_topk(&mut self, k: usize) {
        self.topk = k;
    }

    /// The last trade price observed, whether or not a tick has drained it
    /// out of the current window yet, or `None` if no trade has ever
    /// occurred. Fed to the call-auction matcher's final tie-break rule,
    /// which falls back to proximity to the previous close once volume and
    /// imbalance both tie.
    #[must_use]
    pub fn previous_close(&self) -> Option<Price> {
        if self.window_has_trade {
            return Some(self.window_close);
        }
        if self.previous_close == 0 {
            None
        } else {
            Some(self.previous_close)
        }
    }

    /// Called by the dispatcher whenever the Schedule Engine enters an open
    /// (non-`Closed`) interval. Arms the deadline grid and resets the
    /// window, carrying `previous_close` forward as the new window's
    /// reference price (sentinel `0` if no trade has ever occurred).
    pub fn enter_interval(&mut self, start_ns: i64, end_ns: i64) {
        self.interval_end = end_ns;
        self.reset_window();
        self.next_deadline = if self.snapshot_gap > 0 && start_ns + self.snapshot_gap < end_ns {
            Some(start_ns + self.snapshot_gap)
        } else {
            None
        };
    }

    /// Called by the dispatcher when entering a `Closed` gap: no further
    /// ticks fire until the next `enter_interval`.
    pub fn enter_closed(&mut self) {
        self.next_deadline = None;
    }

    fn reset_window(&mut self) {
        self.window_open = self.previous_close;
        self.window_high = self.previous_close;
        self.window_low = self.previous_close;
        self.window_close = self.previous_close;
        self.window_volume = 0;
        self.window_amount = 0;
        self.window_has_trade = false;
    }

    /// Fold one trade into the current window. Must be called for every
    /// trade produced by either matcher before the next `drain_due` call
    /// that would cross its timestamp.
    pub fn record_trade(&mut self, trade: &Trade) {
        if !self.window_has_trade {
            self.window_open = trade.price;
            self.window_high = trade.price;
            self.window_low = trade.price;
        } else {
            self.window_high = self.window_high.max(trade.price);
            self.window_low = self.window_low.min(trade.price);
        }
        self.window_close = trade.price;
        self.window_volume += trade.quantity;
        self.window_amount += i128::from(trade.price) * i128::from(trade.quantity);
        self.window_has_trade = true;
    }

    /// Emit every tick whose deadline is `<= now_ns`, in order, resetting
    /// the window after each one. `book` is sampled for top-k depth at
    /// emission time, so callers must apply every event at or before each
    /// deadline first.
    pub fn drain_due(&mut self, now_ns: i64, book: &Book) -> Vec<Tick> {
        let mut out = Vec::new();
        while let Some(deadline) = self.next_deadline {
            if deadline > now_ns {
                break;
            }
            let bids = book.side(Side::Bid).topk(self.topk);
            let asks = book.side(Side::Ask).topk(self.topk);
            out.push(Tick {
                timestamp: deadline,
                open: self.window_open,
                high: self.window_high,
                low: self.window_low,
                close: self.window_close,
                volume: self.window_volume,
                amount: self.window_amount,
                bid_prices: bids.iter().map(|(p, _)| *p).collect(),
                bid_volumes: bids.iter().map(|(_, q)| *q).collect(),
                ask_prices: asks.iter().map(|(p, _)| *p).collect(),
                ask_volumes: asks.iter().map(|(_, q)| *q).collect(),
            });
            self.previous_close = self.window_close;
            self.reset_window();

            let candidate = deadline + self.snapshot_gap;
            self.next_deadline = if self.snapshot_gap > 0 && candidate < self.interval_end {
                Some(candidate)
            } else {
                None
            };
        }
        out
    }
}
