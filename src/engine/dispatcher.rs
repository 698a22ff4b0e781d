//! Event Dispatcher: drains pending events whose timestamp has arrived,
//! routes each to the active matching protocol, and drives the Schedule
//! Engine's status transitions (including the implicit call-auction
//! resolution at the end of every `CallAuction` interval).

use std::collections::VecDeque;

use tracing::warn;

use crate::engine::auction;
use crate::engine::book::Book;
use crate::engine::continuous;
use crate::engine::schedule::Schedule;
use crate::engine::tape::TradeTape;
use crate::engine::aggregator::Aggregator;
use crate::error::{EngineError, EngineResult};
use crate::types::{Order, SessionStatus, Tick};

/// Pending-event queue, wall-clock cursor, and active trading status. The
/// brain of the engine: `Engine` (the public facade) owns one of these plus
/// the `Book`/`Schedule`/`Aggregator`/`TradeTape` it operates on.
#[derive(Debug)]
pub struct Dispatcher {
    pending: VecDeque<Order>,
    now_ns: i64,
    status: SessionStatus,
    interval_start: i64,
    unknown_order_count: u64,
}

impl Dispatcher {
    /// A dispatcher with an empty queue, cursor at the start of time, and
    /// status `Closed` until the caller sets a schedule or calls
    /// `set_status` explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            now_ns: i64::MIN,
            status: SessionStatus::Closed,
            interval_start: i64::MIN,
            unknown_order_count: 0,
        }
    }

    /// Merge `events` into the pending queue, re-sorting the whole queue
    /// stably by timestamp: rows may arrive unsorted, so every merge
    /// re-establishes timestamp order. Safe to call more than once (e.g. one
    /// `load` per CSV file); the stable sort preserves each call's relative
    /// arrival order among equal timestamps.
    pub fn enqueue(&mut self, events: impl IntoIterator<Item = Order>) {
        self.pending.extend(events);
        self.pending
            .make_contiguous()
            .sort_by_key(|o| o.timestamp);
    }

    /// The current wall-clock cursor.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.now_ns
    }

    /// The trading status currently in effect.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Force the current status, bypassing whatever a schedule would say.
    /// Used for stepwise host-driven control (`set_status` + `until`) as an
    /// alternative to `set_schedule` + `run`.
    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        if status != SessionStatus::Closed {
            self.interval_start = self.now_ns;
        }
    }

    /// Number of Cancel/Modify events skipped so far for targeting an
    /// absent `uid`. Recoverable: the event is dropped and counted rather
    /// than treated as a fatal error.
    #[must_use]
    pub fn unknown_order_count(&self) -> u64 {
        self.unknown_order_count
    }

    /// Number of events still waiting to be applied.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Advance the cursor to `target_ns`, applying every pending event whose
    /// timestamp has arrived and firing schedule transitions (including the
    /// implicit call-auction resolution) along the way. Newly produced
    /// trades are folded into `aggregator` and appended to `tape`; newly due
    /// ticks are appended to `ticks`.
    ///
    /// # Errors
    /// Propagates `Underflow` (an invariant breach — a bug in this crate).
    /// `UnknownOrder` from an individual event is recoverable and is
    /// absorbed here (counted, logged, skipped), never returned.
    pub fn until(
        &mut self,
        target_ns: i64,
        schedule: Option<&Schedule>,
        book: &mut Book,
        aggregator: &mut Aggregator,
        tape: &mut TradeTape,
        ticks: &mut Vec<Tick>,
    ) -> EngineResult<()> {
        loop {
            if self.status == SessionStatus::Closed {
                let Some(boundary) = schedule.and_then(|s| s.next_boundary_after(self.now_ns))
                else {
                    self.now_ns = target_ns;
                    break;
                };
                if boundary > target_ns {
                    self.now_ns = target_ns;
                    break;
                }
                self.now_ns = boundary;
                self.transition(boundary, schedule.expect("boundary implies schedule"), book, aggregator, tape);
                ticks.extend(aggregator.drain_due(self.now_ns, book));
                continue;
            }

            let t_next = self.pending.front().map(|o| o.timestamp);
            let boundary = schedule.and_then(|s| s.next_boundary_after(self.now_ns));
            let mut stop_at = target_ns;
            if let Some(b) = boundary {
                stop_at = stop_at.min(b);
            }

            if let Some(t) = t_next {
                if t <= stop_at {
                    let mut event = self.pending.pop_front().expect("front just peeked");
                    event.timestamp = event.timestamp.max(self.interval_start);
                    self.now_ns = event.timestamp;
                    self.dispatch(event, book, aggregator, tape)?;
                    ticks.extend(aggregator.drain_due(self.now_ns, book));
                    continue;
                }
            }

            if let Some(b) = boundary {
                if b <= target_ns {
                    self.now_ns = b;
                    self.transition(b, schedule.expect("boundary implies schedule"), book, aggregator, tape);
                    ticks.extend(aggregator.drain_due(self.now_ns, book));
                    continue;
                }
            }

            self.now_ns = target_ns;
            break;
        }
        Ok(())
    }

    /// Force call-auction resolution right now, regardless of status or
    /// schedule. Used both by the public `Engine::match_call_auction` and
    /// internally when a schedule transitions out of a `CallAuction`
    /// interval.
    pub fn force_call_auction(
        &mut self,
        book: &mut Book,
        aggregator: &mut Aggregator,
        tape: &mut TradeTape,
    ) {
        let previous_close = aggregator.previous_close();
        let trades = auction::match_call_auction(book, self.now_ns, previous_close);
        if !trades.is_empty() {
            for trade in &trades {
                aggregator.record_trade(trade);
            }
            tape.record(trades);
        }
    }

    fn transition(
        &mut self,
        ts: i64,
        schedule: &Schedule,
        book: &mut Book,
        aggregator: &mut Aggregator,
        tape: &mut TradeTape,
    ) {
        if self.status == SessionStatus::CallAuction {
            self.force_call_auction(book, aggregator, tape);
        }
        let new_status = schedule.status_at(ts);
        self.status = new_status;
        match new_status {
            SessionStatus::Closed => aggregator.enter_closed(),
            _ => {
                let interval = schedule
                    .interval_at(ts)
                    .expect("non-Closed status_at implies a covering interval");
                self.interval_start = interval.start_ns;
                aggregator.enter_interval(interval.start_ns, interval.end_ns);
            }
        }
    }

    fn dispatch(
        &mut self,
        event: Order,
        book: &mut Book,
        aggregator: &mut Aggregator,
        tape: &mut TradeTape,
    ) -> EngineResult<()> {
        let result = match self.status {
            SessionStatus::ContinuousTrading => continuous::apply(book, event).map(Some),
            SessionStatus::CallAuction => auction::accumulate(book, event).map(|()| None),
            SessionStatus::Closed => {
                unreachable!("Closed events are deferred in `until` before reaching dispatch")
            }
        };
        match result {
            Ok(Some(trades)) => {
                for trade in &trades {
                    aggregator.record_trade(trade);
                }
                tape.record(trades);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(EngineError::UnknownOrder(uid)) => {
                self.unknown_order_count += 1;
                warn!(uid, "unknown order target; event skipped");
                Ok(())
            }
            Err(other) => Err(other),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, Side};

    fn schedule_with_auction_then_continuous() -> Schedule {
        use crate::types::SessionInterval;
        Schedule::new(vec![
            SessionInterval { status: SessionStatus::CallAuction, start_ns: 0, end_ns: 100 },
            SessionInterval { status: SessionStatus::ContinuousTrading, start_ns: 100, end_ns: 1_000 },
        ])
        .unwrap()
    }

    #[test]
    fn closed_gap_defers_events_until_schedule_opens() {
        let schedule = Schedule::new(vec![crate::types::SessionInterval {
            status: SessionStatus::ContinuousTrading,
            start_ns: 500,
            end_ns: 1_000,
        }])
        .unwrap();
        let mut dispatcher = Dispatcher::new();
        let mut book = Book::new();
        let mut aggregator = Aggregator::new(0, 5);
        let mut tape = TradeTape::new();
        let mut ticks = Vec::new();

        dispatcher.enqueue(vec![Order::limit(1, Side::Bid, 100, 10, 50)]);
        dispatcher
            .until(500, Some(&schedule), &mut book, &mut aggregator, &mut tape, &mut ticks)
            .unwrap();

        assert_eq!(book.remaining(1), Some(10));
        assert_eq!(dispatcher.status(), SessionStatus::ContinuousTrading);
    }

    #[test]
    fn call_auction_resolves_automatically_at_interval_exit() {
        let schedule = schedule_with_auction_then_continuous();
        let mut dispatcher = Dispatcher::new();
        let mut book = Book::new();
        let mut aggregator = Aggregator::new(0, 5);
        let mut tape = TradeTape::new();
        let mut ticks = Vec::new();

        dispatcher.enqueue(vec![
            Order::limit(1, Side::Bid, 100, 10, 10),
            Order::limit(2, Side::Ask, 100, 10, 20),
        ]);
        dispatcher
            .until(1_000, Some(&schedule), &mut book, &mut aggregator, &mut tape, &mut ticks)
            .unwrap();

        assert_eq!(tape.len(), 1);
        assert_eq!(dispatcher.status(), SessionStatus::ContinuousTrading);
    }

    #[test]
    fn unknown_order_is_recoverable_and_counted() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_status(SessionStatus::ContinuousTrading);
        let mut book = Book::new();
        let mut aggregator = Aggregator::new(0, 5);
        let mut tape = TradeTape::new();
        let mut ticks = Vec::new();

        dispatcher.enqueue(vec![Order::cancel(1, Side::Bid, 999, 0)]);
        dispatcher
            .until(100, None, &mut book, &mut aggregator, &mut tape, &mut ticks)
            .unwrap();

        assert_eq!(dispatcher.unknown_order_count(), 1);
    }

    #[test]
    fn stepwise_set_status_without_schedule_dispatches_immediately() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_status(SessionStatus::ContinuousTrading);
        let mut book = Book::new();
        let mut aggregator = Aggregator::new(0, 5);
        let mut tape = TradeTape::new();
        let mut ticks = Vec::new();

        dispatcher.enqueue(vec![
            Order::limit(1, Side::Bid, 100, 10, 0),
            Order::limit(2, Side::Ask, 100, 6, 1),
        ]);
        dispatcher
            .until(10, None, &mut book, &mut aggregator, &mut tape, &mut ticks)
            .unwrap();

        assert_eq!(tape.len(), 1);
        assert_eq!(book.remaining(1), Some(4));
    }
}
