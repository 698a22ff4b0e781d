//! Error taxonomy for the matching engine.

use thiserror::Error;

/// Errors surfaced by [`crate::Engine`] and its components.
///
/// An empty book side is deliberately *not* represented by a variant here
/// — callers see that case as `Option::None` from `BookSide::best_price`
/// and friends, not as an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A CSV row or field could not be parsed into a valid event.
    #[error("invalid input at row {row}: {message}")]
    InvalidInput {
        /// 1-indexed row number within the source file (header excluded).
        row: usize,
        /// Human-readable description of what failed to parse.
        message: String,
    },

    /// `set_schedule` was given overlapping or out-of-order intervals.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A Cancel or Modify referenced a `uid` with no live resting order.
    #[error("unknown order: {0}")]
    UnknownOrder(u64),

    /// A `PriceLevel::reduce` was asked to subtract more than the order's
    /// remaining quantity. Reaching this from any public `Engine` call is a
    /// bug in this crate: the dispatcher never requests a reduction larger
    /// than the quantity it just observed on the resting order.
    #[error("underflow: attempted to reduce order {uid} by {delta}, only {remaining} remain")]
    Underflow {
        /// The order whose remaining quantity would have gone negative.
        uid: u64,
        /// The requested reduction.
        delta: u64,
        /// The quantity actually remaining before the reduction.
        remaining: u64,
    },

    /// `PriceLevel::remove` / `OrderIndex` lookup used a stale handle.
    #[error("order {0} not found in its price level")]
    NotFound(u64),
}

/// Convenience alias used throughout the crate.
pub type EngineResult<T> = Result<T, EngineError>;
