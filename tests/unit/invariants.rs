//! Invariants the engine must hold after any sequence of continuous-trading
//! events, checked against the observable, public surface only.

use lob_engine::prelude::*;

fn best_prices(dump: &str) -> (Option<i64>, Option<i64>) {
    let mut lines = dump.lines();
    let mut best_bid = None;
    let mut best_ask = None;
    let mut in_bids = false;
    for line in lines.by_ref() {
        if line == "bids:" {
            in_bids = true;
            continue;
        }
        if line == "asks:" {
            in_bids = false;
            continue;
        }
        let Some(price_str) = line.trim().split(" x ").next() else { continue };
        let Ok(price) = price_str.parse::<i64>() else { continue };
        if in_bids && best_bid.is_none() {
            best_bid = Some(price);
        } else if !in_bids && best_ask.is_none() {
            best_ask = Some(price);
        }
    }
    (best_bid, best_ask)
}

#[test]
fn continuous_matching_never_leaves_a_crossed_book() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_status(SessionStatus::ContinuousTrading);
    engine.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    engine.submit(Order::limit(2, Side::Bid, 99_00, 10, 1));
    engine.submit(Order::limit(3, Side::Ask, 101_00, 10, 2));
    engine.submit(Order::limit(4, Side::Ask, 100_50, 5, 3));
    engine.submit(Order::limit(5, Side::Bid, 100_75, 3, 4));
    engine.until(10).unwrap();

    let (best_bid, best_ask) = best_prices(&engine.show());
    if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
        assert!(bid < ask, "resting best bid {bid} must never meet or cross best ask {ask}");
    }
}

#[test]
fn every_trade_quantity_is_bounded_by_both_participating_orders_submitted_quantity() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_status(SessionStatus::ContinuousTrading);
    engine.submit(Order::limit(1, Side::Bid, 100_00, 7, 0));
    engine.submit(Order::limit(2, Side::Bid, 100_00, 3, 1));
    engine.submit(Order::limit(3, Side::Ask, 100_00, 20, 2));
    engine.until(10).unwrap();

    for trade in engine.get_transactions() {
        assert!(trade.quantity <= 7, "no single fill can exceed the smaller resting order's size in this scenario");
    }
    let total: u64 = engine.get_transactions().map(|t| t.quantity).sum();
    assert_eq!(total, 10, "all resting bid quantity should have been consumed by the larger ask");
}

#[test]
fn cancelling_an_order_twice_reports_unknown_order_the_second_time() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_status(SessionStatus::ContinuousTrading);
    engine.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    engine.submit(Order::cancel(2, Side::Bid, 1, 1));
    engine.submit(Order::cancel(3, Side::Bid, 1, 2));
    engine.until(10).unwrap();

    assert_eq!(engine.unknown_order_count(), 1);
}

#[test]
fn a_fully_closed_schedule_defers_every_event_until_the_session_opens() {
    let mut engine = Engine::new(EngineConfig::default());
    engine
        .set_schedule(vec![SessionInterval {
            status: SessionStatus::ContinuousTrading,
            start_ns: 1_000,
            end_ns: 2_000,
        }])
        .unwrap();
    engine.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    engine.until(500).unwrap();

    assert_eq!(engine.get_transactions().count(), 0);
    assert_eq!(engine.status(), SessionStatus::Closed);

    engine.until(1_500).unwrap();
    assert_eq!(engine.status(), SessionStatus::ContinuousTrading);
}
