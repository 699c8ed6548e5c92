// ============================================================================
// Matching Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Sortable Encoding - Ratio to index-key bytes
// 2. Full Matching - Crossing an incoming order against a populated wall
// 3. Order Submission - Resting orders that do not cross
// 4. Queries - Reading a whole order wall
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use orderwall_engine::prelude::*;
use std::hint::black_box;

const FUNDING: u64 = u64::MAX / 4;

fn funded_engine() -> MatchingEngine {
    let ledger = InMemoryLedger::new()
        .with_balance("maker", Amount::new("BTC", FUNDING))
        .with_balance("taker", Amount::new("USD", FUNDING));
    MatchingEngineBuilder::new("bench")
        .with_ledger(ledger)
        .build()
        .unwrap()
}

fn ask(ratio: i64, quantity: u64) -> MsgMakeOrder {
    MsgMakeOrder::new(
        "maker",
        Amount::new("BTC", quantity),
        Price::new(Ratio::from_integer(ratio).unwrap(), "USD", "BTC").unwrap(),
        None,
    )
}

/// Limit of 1/`min_ratio` BTC per USD; crosses every ask priced at or above
/// `min_ratio`.
fn bid(min_ratio: i64, quantity: u64) -> MsgMakeOrder {
    let limit = Ratio::from_integer(min_ratio).unwrap().reciprocal().unwrap();
    MsgMakeOrder::new(
        "taker",
        Amount::new("USD", quantity),
        Price::new(limit, "BTC", "USD").unwrap(),
        None,
    )
}

// ============================================================================
// Sortable Encoding
// ============================================================================

fn benchmark_sortable_bytes(c: &mut Criterion) {
    let ratios: Vec<Ratio> = ["0.0000000001", "0.05", "1", "20", "50000.125", "10000000000"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    c.bench_function("ratio_sortable_bytes", |b| {
        b.iter(|| {
            for ratio in &ratios {
                black_box(ratio.sortable_bytes().unwrap());
            }
        });
    });
}

// ============================================================================
// Full Matching Engine Benchmarks
// ============================================================================

fn benchmark_crossing_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossing_submit");

    for wall_depth in [100i64, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(wall_depth),
            wall_depth,
            |b, &wall_depth| {
                let mut engine = funded_engine();
                for i in 0..wall_depth {
                    engine.submit(ask(50_000 + i, 1_000_000_000)).unwrap();
                }

                // Partially fills the best ask, so the wall never drains
                b.iter(|| black_box(engine.submit(bid(50_000, 50_000)).unwrap()));
            },
        );
    }

    group.finish();
}

fn benchmark_sweep_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_levels");

    for levels in [1i64, 5, 20].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(levels), levels, |b, &levels| {
            b.iter_batched(
                || {
                    let mut engine = funded_engine();
                    for i in 0..levels {
                        engine.submit(ask(50_000 + i, 1)).unwrap();
                    }
                    engine
                },
                |mut engine| black_box(engine.submit(bid(50_000, 60_000 * levels as u64)).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Order Submission Without Matching
// ============================================================================

fn benchmark_order_submission_no_match(c: &mut Criterion) {
    c.bench_function("submit_resting_order", |b| {
        let mut engine = funded_engine();
        let mut i = 0i64;
        b.iter(|| {
            i = (i + 1) % 10_000;
            black_box(engine.submit(ask(50_000 + i, 1)).unwrap())
        });
    });
}

// ============================================================================
// Query Benchmarks
// ============================================================================

fn benchmark_order_wall_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_wall_query");

    for wall_depth in [10i64, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(wall_depth),
            wall_depth,
            |b, &wall_depth| {
                let mut engine = funded_engine();
                for i in 0..wall_depth {
                    engine.submit(ask(50_000 + i, 1)).unwrap();
                }
                let pair = DenomPair::new("BTC", "USD");

                b.iter(|| black_box(engine.get_order_wall(&pair).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sortable_bytes,
    benchmark_crossing_submit,
    benchmark_sweep_levels,
    benchmark_order_submission_no_match,
    benchmark_order_wall_query
);

criterion_main!(benches);
