use criterion::{criterion_group, criterion_main};

mod auction;

use auction::register_benchmarks as register_auction_benchmarks;
use continuous::register_benchmarks as register_continuous_benchmarks;

criterion_group!(
    benches,
    register_continuous_benchmarks,
    register_auction_benchmarks,
);

criterion_main!(benches);
