//! Prelude module re-exporting the types most hosts need.
//!
//! ```rust
//! use lob_engine::prelude::*;
//! ```

pub use crate::config::{a_share_schedule, EngineConfig};
pub use crate::engine::schedule::Schedule;
pub use crate::engine::Engine;
pub use crate::error::{EngineError, EngineResult};
pub use crate::types::{
    Order, OrderKind, Price, SessionInterval, SessionStatus, Side, Tick, Trade,
};
