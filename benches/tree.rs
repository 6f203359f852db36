//! Benchmarks for collection tree reconstruction and grouping.
//!
//! Benchmark targets:
//! - 1,000 collections: <1ms
//! - 10,000 collections: <10ms
//! - Deep single chain of 5,000: <10ms

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use raindrop_mcp::models::{CollectionId, CollectionItem, Group};
use raindrop_mcp::{build_forest, partition};

// ============================================================================
// Fixtures
// ============================================================================

/// Wide account: a tenth of the collections are roots, the rest hang off
/// earlier collections. Children are listed before their parents.
fn wide_batch(count: i64) -> Vec<CollectionItem> {
    let roots = (count / 10).max(1);
    let mut records: Vec<CollectionItem> = (roots + 1..=count)
        .map(|id| CollectionItem::new(id, format!("c{id}")).with_parent((id * 7) % (id - 1) + 1))
        .collect();
    records.extend((1..=roots).map(|id| CollectionItem::new(id, format!("root{id}"))));
    records
}

/// Single chain `1 <- 2 <- ... <- depth`, listed deepest first.
fn chain(depth: i64) -> Vec<CollectionItem> {
    (1..=depth)
        .rev()
        .map(|id| {
            let item = CollectionItem::new(id, format!("c{id}"));
            if id == 1 { item } else { item.with_parent(id - 1) }
        })
        .collect()
}

fn groups_for(roots: i64) -> Vec<Group> {
    let ids: Vec<CollectionId> = (1..=roots).collect();
    ids.chunks(10)
        .enumerate()
        .map(|(n, chunk)| Group::new(format!("group{n}"), chunk.to_vec()))
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_build_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_forest");
    group.measurement_time(Duration::from_secs(5));

    for count in [100i64, 1_000, 10_000] {
        let batch = wide_batch(count);
        group.throughput(Throughput::Elements(count.unsigned_abs()));
        group.bench_with_input(BenchmarkId::new("wide", count), &batch, |b, batch| {
            b.iter(|| build_forest(black_box(batch.clone())));
        });
    }

    let deep = chain(5_000);
    group.bench_function("deep_chain_5000", |b| {
        b.iter(|| build_forest(black_box(deep.clone())));
    });

    group.finish();
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");

    for count in [1_000i64, 10_000] {
        let forest = build_forest(wide_batch(count));
        let groups = groups_for(count / 10);
        group.bench_with_input(
            BenchmarkId::new("groups_of_ten", count),
            &(forest, groups),
            |b, (forest, groups)| {
                b.iter(|| partition(black_box(forest.clone()), black_box(groups.clone())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build_forest, bench_partition);
criterion_main!(benches);
