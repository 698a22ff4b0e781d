//! Property-based checks on non-crossing order accumulation: however many
//! distinct-priced bids are submitted, none of them should ever trade
//! against each other, and the book should retain exactly what was
//! submitted.

use std::collections::BTreeMap;

use lob_engine::prelude::*;
use proptest::prelude::*;

fn resting_bid_quantity(dump: &str, price: i64) -> Option<u64> {
    let needle = format!("  {price} x ");
    dump.lines().find_map(|line| {
        line.strip_prefix(&needle)
            .and_then(|rest| rest.trim().parse::<u64>().ok())
    })
}

proptest! {
    #[test]
    fn non_crossing_bids_never_trade_and_keep_their_full_quantity(
        orders in prop::collection::vec((1_i64..10_000, 1_u64..1_000), 1..40)
    ) {
        // Collapse to one order per price: duplicate prices would legitimately
        // queue FIFO at the same level, which is a different property.
        let mut by_price: BTreeMap<i64, u64> = BTreeMap::new();
        for (price, qty) in orders {
            by_price.insert(price, qty);
        }

        let mut engine = Engine::new(EngineConfig::default());
        engine.set_status(SessionStatus::ContinuousTrading);
        for (uid, (price, qty)) in by_price.iter().enumerate() {
            engine.submit(Order::limit(uid as u64 + 1, Side::Bid, *price, *qty, uid as i64));
        }
        engine.until(by_price.len() as i64 + 1).unwrap();

        prop_assert_eq!(engine.get_transactions().count(), 0);

        let dump = engine.show();
        for (price, qty) in &by_price {
            prop_assert_eq!(resting_bid_quantity(&dump, *price), Some(*qty));
        }
    }
}
