use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lob_engine::{Engine, EngineConfig, Order, SessionStatus, Side};

/// Register benchmarks for uniform-price call-auction resolution.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Call Auction Matcher");

    for &order_count in &[100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("resolve_clearing_price", order_count),
            &order_count,
            |b, &count| {
                b.iter_with_setup(
                    || {
                        let mut engine = Engine::new(EngineConfig::default());
                        engine.set_status(SessionStatus::CallAuction);
                        for i in 0..count {
                            let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
                            let price = 1_000 + (i % 200) as i64 - 100;
                            engine.submit(Order::limit(i as u64 + 1, side, price, 10, i as i64));
                        }
                        engine.until(count as i64 + 1).unwrap();
                        engine
                    },
                    |mut engine| {
                        black_box(engine.match_call_auction());
                    },
                );
            },
        );
    }

    group.finish();
}
