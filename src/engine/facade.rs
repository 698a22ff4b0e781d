//! `Engine`: the crate's top-level type and the host-facing surface for
//! every matching-engine operation. Composes the `Book`, the `Schedule`, the
//! `Dispatcher`, the `Aggregator`, and the `TradeTape` into the one object a
//! host constructs, feeds events into, and drives forward in time.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::config::EngineConfig;
use crate::engine::aggregator::Aggregator;
use crate::engine::book::Book;
use crate::engine::book_side::BookSide;
use crate::engine::dispatcher::Dispatcher;
use crate::engine::schedule::Schedule;
use crate::engine::tape::TradeTape;
use crate::error::EngineResult;
use crate::ingest;
use crate::types::{Order, SessionInterval, SessionStatus, Tick, Trade};

/// A single-book, single-threaded replay engine: load a time-ordered event
/// stream, drive it forward against a session schedule (or by hand via
/// `set_status` + `until`), and read back the resulting trade tape and tick
/// stream.
pub struct Engine {
    config: EngineConfig,
    book: Book,
    schedule: Option<Schedule>,
    dispatcher: Dispatcher,
    aggregator: Aggregator,
    tape: TradeTape,
    ticks: Vec<Tick>,
}

impl Engine {
    /// A fresh engine with an empty book, no schedule, and `Closed` status
    /// until the host calls `set_schedule`/`set_status`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let aggregator = Aggregator::new(config.snapshot_gap, config.topk);
        Self {
            config,
            book: Book::new(),
            schedule: None,
            dispatcher: Dispatcher::new(),
            aggregator,
            tape: TradeTape::new(),
            ticks: Vec::new(),
        }
    }

    /// Convenience constructor: a fresh engine pre-loaded with the built-in
    /// A-share session calendar (`Schedule::a_share_default`), equivalent to
    /// the original Python harness's `LimitOrderBook(schedule="AShare")`.
    #[must_use]
    pub fn with_a_share_schedule(config: EngineConfig) -> Self {
        let mut engine = Self::new(config);
        engine.schedule = Some(Schedule::a_share_default());
        engine
    }

    /// Ingest every row of the CSV event file at `path`, sorting them
    /// stably by timestamp into the pending queue.
    /// Returns the number of events ingested. The file is opened, fully
    /// drained, and closed on every exit path, including a parse error
    /// partway through — `ingest::load_csv` never holds the handle open
    /// past its own return.
    ///
    /// # Errors
    /// `InvalidInput` on the first malformed row; ingestion aborts and
    /// leaves any previously loaded events untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let events = ingest::load_csv(path.as_ref(), &self.config)?;
        let count = events.len();
        info!(path = %path.as_ref().display(), count, "loaded events");
        self.dispatcher.enqueue(events);
        Ok(count)
    }

    /// Enqueue a single pre-built event, e.g. one constructed programmatically
    /// rather than read from a CSV file. Re-sorts the pending queue stably by
    /// timestamp, same as `load`.
    pub fn submit(&mut self, order: Order) {
        self.dispatcher.enqueue(std::iter::once(order));
    }

    /// Force the current trading status, overriding whatever a schedule
    /// would otherwise say. Used for stepwise host-driven control as an
    /// alternative to `set_schedule` + `run`.
    pub fn set_status(&mut self, status: SessionStatus) {
        self.dispatcher.set_status(status);
    }

    /// Install a validated, non-overlapping, start-sorted session schedule.
    ///
    /// # Errors
    /// `InvalidSchedule` if intervals overlap or are out of order; the
    /// previously installed schedule (if any) is left untouched.
    pub fn set_schedule(&mut self, intervals: Vec<SessionInterval>) -> EngineResult<()> {
        self.schedule = Some(Schedule::new(intervals)?);
        Ok(())
    }

    /// Reconfigure the tick cadence, in nanoseconds.
    pub fn set_snapshot_gap(&mut self, ns: i64) {
        self.config.snapshot_gap = ns;
        self.aggregator.set_snapshot_gap(ns);
    }

    /// Reconfigure top-k depth captured on every future tick.
    pub fn set_topk(&mut self, k: usize) {
        self.config.topk = k;
        self.aggregator.set_topk(k);
    }

    /// Advance the cursor to `target_ns`, applying every pending event whose
    /// timestamp has arrived and following schedule transitions along the
    /// way (including the implicit call-auction resolution at the end of
    /// each `CallAuction` interval).
    ///
    /// # Errors
    /// Propagates `Underflow`, an internal invariant breach. Per-event
    /// `UnknownOrder` is recoverable and absorbed (see `unknown_order_count`).
    pub fn until(&mut self, target_ns: i64) -> EngineResult<()> {
        self.dispatcher.until(
            target_ns,
            self.schedule.as_ref(),
            &mut self.book,
            &mut self.aggregator,
            &mut self.tape,
            &mut self.ticks,
        )
    }

    /// Run to the end of the installed schedule (or, with no schedule, until
    /// the pending queue is drained under whatever status `set_status` left
    /// in effect).
    ///
    /// # Errors
    /// See `until`.
    pub fn run(&mut self) -> EngineResult<()> {
        self.until(i64::MAX)
    }

    /// Force call-auction resolution right now, regardless of status or
    /// schedule, and return the trades it produced (also appended to the
    /// trade tape).
    pub fn match_call_auction(&mut self) -> Vec<Trade> {
        let before = self.tape.len();
        self.dispatcher
            .force_call_auction(&mut self.book, &mut self.aggregator, &mut self.tape);
        self.tape.get_transactions().skip(before).copied().collect()
    }

    /// Every trade recorded so far, in emission order. Finite and
    /// restartable.
    pub fn get_transactions(&self) -> impl Iterator<Item = &Trade> + '_ {
        self.tape.get_transactions()
    }

    /// Every tick emitted so far, in emission order. Finite and restartable.
    pub fn get_ticks(&self) -> impl Iterator<Item = &Tick> + '_ {
        self.ticks.iter()
    }

    /// Number of Cancel/Modify events skipped so far for targeting an absent
    /// `uid`.
    #[must_use]
    pub fn unknown_order_count(&self) -> u64 {
        self.dispatcher.unknown_order_count()
    }

    /// The wall-clock cursor, in nanoseconds.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.dispatcher.now()
    }

    /// The trading status currently in effect.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.dispatcher.status()
    }

    /// A stable, human-readable dump of the current book state: best-price
    /// depth on both sides, one line per price level, best first.
    #[must_use]
    pub fn show(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "status={:?} now={}", self.status(), self.now());
        let _ = writeln!(out, "bids:");
        for (price, level) in self.book.side(crate::types::Side::Bid).iter_from_best() {
            let qty = BookSide::lock_level(&level).total_quantity();
            let _ = writeln!(out, "  {price} x {qty}");
        }
        let _ = writeln!(out, "asks:");
        for (price, level) in self.book.side(crate::types::Side::Ask).iter_from_best() {
            let qty = BookSide::lock_level(&level).total_quantity();
            let _ = writeln!(out, "  {price} x {qty}");
        }
        out
    }

    /// A stable, human-readable dump of every trade recorded so far.
    #[must_use]
    pub fn show_transactions(&self) -> String {
        let mut out = String::new();
        for trade in self.tape.get_transactions() {
            let _ = writeln!(
                out,
                "t={} bid={} ask={} price={} qty={}",
                trade.timestamp, trade.bid_uid, trade.ask_uid, trade.price, trade.quantity
            );
        }
        out
    }
}
