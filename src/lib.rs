//! # A-Share Limit Order Book Matching Engine
//!
//! A single-threaded, synchronous matching engine that replays a
//! time-ordered stream of order events against a two-sided price-priority
//! book and produces a trade tape plus periodic OHLCV/depth ticks. Matching
//! runs two protocols depending on the session status a built-in (or
//! custom) schedule assigns to the current wall-clock cursor:
//!
//! - **Continuous double-auction** ([`engine::continuous`]): every
//!   aggressive `Limit`/`Market` order crosses the opposite side
//!   immediately, in strict price-then-time priority.
//! - **Uniform-price call auction** ([`engine::auction`]): orders
//!   accumulate without matching until the interval ends, at which point a
//!   single clearing price maximizing executable volume is resolved and
//!   every crossable unit trades at that one price.
//!
//! ## Example
//!
//! ```no_run
//! use lob_engine::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.set_schedule(vec![SessionInterval {
//!     status: SessionStatus::ContinuousTrading,
//!     start_ns: 0,
//!     end_ns: 1_000_000_000,
//! }]).unwrap();
//! engine.load("demos/data/sample.csv").unwrap();
//! engine.run().unwrap();
//!
//! for trade in engine.get_transactions() {
//!     println!("{trade:?}");
//! }
//! ```
//!
//! ## Scope
//!
//! One book per `Engine` instance; no live network feed handling, no
//! risk/credit checks, no persistence/recovery, no floating-point tolerance
//! in price comparisons (prices are exact scaled integers throughout). See
//! `DESIGN.md` for the grounding of every module and the decisions this
//! crate made on points left otherwise unresolved.

pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod prelude;
pub mod types;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use types::{Order, OrderKind, Price, SessionInterval, SessionStatus, Side, Tick, Trade};
