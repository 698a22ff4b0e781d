//! Integration tests driving the engine purely through its public surface
//! (`lob_engine::prelude`), the way a host application would.

mod determinism;
mod invariants;
mod properties;
mod scenarios;
