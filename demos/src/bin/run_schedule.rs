//! Installs the built-in A-share calendar and lets `run` drive every
//! session transition unattended, mirroring the original tick-aggregation
//! harness: load, schedule, set a snapshot cadence, run to completion, then
//! report the trade and tick counts.

use lob_engine::prelude::*;

const SNAPSHOT_GAP_NS: i64 = 3_000_000_000;

fn main() {
    tracing_subscriber::fmt::init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample.csv");
    let mut engine = Engine::with_a_share_schedule(EngineConfig::default());
    engine.set_snapshot_gap(SNAPSHOT_GAP_NS);

    let loaded = engine.load(path).expect("load demo events");
    println!("loaded {loaded} events from {path}");

    engine.run().expect("run to the close");

    let transactions: Vec<_> = engine.get_transactions().collect();
    println!("{} transactions executed", transactions.len());
    for trade in &transactions {
        println!("{trade:?}");
    }

    let ticks: Vec<_> = engine.get_ticks().collect();
    println!("{} ticks emitted", ticks.len());
    for tick in &ticks {
        println!("{tick:?}");
    }
}
