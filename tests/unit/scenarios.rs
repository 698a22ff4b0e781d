use lob_engine::prelude::*;

fn continuous_engine() -> Engine {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_status(SessionStatus::ContinuousTrading);
    engine
}

#[test]
fn aggressive_limit_crosses_resting_order_at_the_passive_price() {
    let mut engine = continuous_engine();
    engine.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    engine.submit(Order::limit(2, Side::Ask, 99_00, 6, 1));
    engine.until(10).unwrap();

    let trades: Vec<Trade> = engine.get_transactions().copied().collect();
    assert_eq!(
        trades,
        vec![Trade { bid_uid: 1, ask_uid: 2, price: 100_00, quantity: 6, timestamp: 1 }]
    );
}

#[test]
fn equal_price_orders_fill_in_arrival_order() {
    let mut engine = continuous_engine();
    engine.submit(Order::limit(1, Side::Bid, 100_00, 5, 0));
    engine.submit(Order::limit(2, Side::Bid, 100_00, 5, 1));
    engine.submit(Order::limit(3, Side::Ask, 100_00, 5, 2));
    engine.until(10).unwrap();

    let trades: Vec<Trade> = engine.get_transactions().copied().collect();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].bid_uid, 1, "the earlier resting bid should fill first");
}

#[test]
fn cancel_removes_a_resting_order_before_it_can_fill() {
    let mut engine = continuous_engine();
    engine.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    engine.submit(Order::cancel(2, Side::Bid, 1, 1));
    engine.submit(Order::limit(3, Side::Ask, 100_00, 10, 2));
    engine.until(10).unwrap();

    assert_eq!(engine.get_transactions().count(), 0);
}

#[test]
fn market_order_sweeps_the_book_and_discards_any_remainder() {
    let mut engine = continuous_engine();
    engine.submit(Order::limit(1, Side::Ask, 100_00, 4, 0));
    engine.submit(Order::limit(2, Side::Ask, 101_00, 4, 1));
    engine.submit(Order::market(3, Side::Bid, 20, 2));
    engine.until(10).unwrap();

    let trades: Vec<Trade> = engine.get_transactions().copied().collect();
    assert_eq!(trades.len(), 2);
    let swept: u64 = trades.iter().map(|t| t.quantity).sum();
    assert_eq!(swept, 8, "only the 8 resting shares should trade; the rest is discarded");
}

#[test]
fn call_auction_resolves_a_single_clearing_price_for_every_crossable_unit() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_status(SessionStatus::CallAuction);
    engine.submit(Order::limit(1, Side::Bid, 1000, 100, 0));
    engine.submit(Order::limit(2, Side::Bid, 990, 100, 1));
    engine.submit(Order::limit(3, Side::Ask, 980, 150, 2));
    engine.submit(Order::limit(4, Side::Ask, 995, 100, 3));
    engine.until(10).unwrap();
    let trades = engine.match_call_auction();

    assert!(!trades.is_empty());
    let clearing_price = trades[0].price;
    assert!(trades.iter().all(|t| t.price == clearing_price), "every execution shares one clearing price");
    let total: u64 = trades.iter().map(|t| t.quantity).sum();
    assert_eq!(total, 150, "the maximum executable volume for this book is 150 shares");
}

#[test]
fn ticks_summarize_trades_observed_within_the_snapshot_window() {
    let mut engine = Engine::new(EngineConfig::default().with_snapshot_gap(5));
    engine.set_status(SessionStatus::ContinuousTrading);
    engine.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    engine.submit(Order::limit(2, Side::Ask, 100_00, 10, 1));
    engine.until(20).unwrap();

    let ticks: Vec<_> = engine.get_ticks().collect();
    assert!(!ticks.is_empty());
    let first = &ticks[0];
    assert_eq!(first.close, 100_00);
    assert_eq!(first.volume, 10);
}

#[test]
fn modify_is_equivalent_to_a_cancel_followed_by_a_fresh_limit() {
    let mut via_modify = continuous_engine();
    via_modify.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    via_modify.submit(Order::modify(1, Side::Bid, 1, 101_00, 8, 5));
    via_modify.until(10).unwrap();

    let mut via_cancel_then_limit = continuous_engine();
    via_cancel_then_limit.submit(Order::limit(1, Side::Bid, 100_00, 10, 0));
    via_cancel_then_limit.submit(Order::cancel(99, Side::Bid, 1, 5));
    via_cancel_then_limit.submit(Order::limit(1, Side::Bid, 101_00, 8, 5));
    via_cancel_then_limit.until(10).unwrap();

    assert_eq!(via_modify.show(), via_cancel_then_limit.show());
}
