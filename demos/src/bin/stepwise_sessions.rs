//! Drives a single day's sessions by hand: `set_status` + `until` +
//! `match_call_auction`, the same stepwise pattern the original Python
//! harness's pre-opening/morning/afternoon/closing demo script uses,
//! instead of installing a schedule and calling `run`.

use lob_engine::prelude::*;

fn ns(h: i64, m: i64) -> i64 {
    (h * 3_600 + m * 60) * 1_000_000_000
}

fn main() {
    tracing_subscriber::fmt::init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample.csv");
    let mut engine = Engine::new(EngineConfig::default());
    let loaded = engine.load(path).expect("load demo events");
    println!("loaded {loaded} events from {path}");

    engine.set_status(SessionStatus::CallAuction);
    engine.until(ns(9, 25)).expect("advance through pre-opening auction");
    engine.match_call_auction();
    println!("--- after pre-opening call auction ---");
    print!("{}", engine.show());

    engine.set_status(SessionStatus::ContinuousTrading);
    engine.until(ns(11, 30)).expect("advance through morning session");
    println!("--- morning session transactions ---");
    print!("{}", engine.show_transactions());

    engine.set_status(SessionStatus::CallAuction);
    engine.until(ns(15, 0)).expect("advance to the close");
    engine.match_call_auction();
    println!("--- after closing call auction ---");
    print!("{}", engine.show());

    println!(
        "unknown order events skipped: {}",
        engine.unknown_order_count()
    );
}
