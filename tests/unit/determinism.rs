use lob_engine::prelude::*;

fn sample_events() -> Vec<Order> {
    vec![
        Order::limit(1, Side::Bid, 100_00, 10, 5),
        Order::limit(2, Side::Bid, 99_50, 20, 2),
        Order::limit(3, Side::Ask, 100_50, 15, 1),
        Order::limit(4, Side::Ask, 99_80, 5, 8),
        Order::cancel(5, Side::Bid, 2, 9),
        Order::limit(6, Side::Ask, 99_90, 12, 3),
        Order::modify(7, Side::Ask, 3, 99_95, 10, 11),
        Order::market(8, Side::Bid, 6, 12),
    ]
}

fn replay() -> Engine {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_status(SessionStatus::ContinuousTrading);
    for event in sample_events() {
        engine.submit(event);
    }
    engine.until(100).unwrap();
    engine
}

#[test]
fn replaying_the_same_event_stream_twice_produces_identical_trade_tapes() {
    let first = replay();
    let second = replay();

    let first_trades: Vec<Trade> = first.get_transactions().copied().collect();
    let second_trades: Vec<Trade> = second.get_transactions().copied().collect();
    assert_eq!(first_trades, second_trades);
    assert_eq!(first.show(), second.show());
}

#[test]
fn events_submitted_out_of_timestamp_order_are_still_applied_in_timestamp_order() {
    let mut submitted_in_order = Engine::new(EngineConfig::default());
    submitted_in_order.set_status(SessionStatus::ContinuousTrading);
    let mut events = sample_events();
    events.sort_by_key(|o| o.timestamp);
    for event in events {
        submitted_in_order.submit(event);
    }
    submitted_in_order.until(100).unwrap();

    let shuffled = replay();

    let ordered_trades: Vec<Trade> = submitted_in_order.get_transactions().copied().collect();
    let shuffled_trades: Vec<Trade> = shuffled.get_transactions().copied().collect();
    assert_eq!(ordered_trades, shuffled_trades);
}
