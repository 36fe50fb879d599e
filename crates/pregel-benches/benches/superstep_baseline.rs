// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow] (attributes on macro invocations are ignored). Crate-level
// suppress is required for benchmark binaries using Criterion.
#![allow(missing_docs)]
#![allow(clippy::expect_used)]
//! Superstep engine baselines.
//!
//! # Running
//!
//! ```sh
//! cargo bench --package pregel-benches --bench superstep_baseline
//! ```
//!
//! # What This Measures
//!
//! - `page_rank_10`: ten propagation supersteps, serial vs 4 workers
//! - `worker_scaling_50k`: same workload across 1, 2, 4, 8 workers
//! - `message_strategy`: queue mailboxes (sssp) vs reducing mailboxes
//!   (components) on one graph
//! - `partitioning_hubs`: range vs degree partitioning on a skewed graph
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pregel_benches::{hub_graph, uniform_graph};
use pregel_core::demo::{ConnectedComponents, PageRank, ShortestPaths};
use pregel_core::{run, Partitioning, PregelConfig};
use std::time::Duration;

fn config(workers: usize, max_supersteps: usize) -> PregelConfig {
    PregelConfig::default()
        .with_concurrency(workers)
        .with_max_supersteps(max_supersteps)
}

/// Ten PageRank supersteps, serial vs 4 workers, at several graph sizes.
fn bench_page_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_rank_10");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(30);

    for &n in &[1_000usize, 10_000, 100_000] {
        let graph = uniform_graph(n, 8, 0x5EED).expect("bench graph");
        group.throughput(Throughput::Elements((n * 10) as u64));
        for workers in [1, 4] {
            group.bench_with_input(BenchmarkId::new(format!("{workers}w"), n), &n, |b, _| {
                b.iter(|| {
                    let result = run(&graph, &PageRank::default(), None, config(workers, 10))
                        .expect("page rank runs");
                    criterion::black_box(result)
                });
            });
        }
    }
    group.finish();
}

/// Throughput as the worker count grows, fixed 50k-node workload.
fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_scaling_50k");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(30);

    const NODES: usize = 50_000;
    let graph = uniform_graph(NODES, 8, 0xACE).expect("bench graph");
    group.throughput(Throughput::Elements((NODES * 10) as u64));
    for &workers in &[1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| {
                let result = run(&graph, &PageRank::default(), None, config(w, 10))
                    .expect("page rank runs");
                criterion::black_box(result)
            });
        });
    }
    group.finish();
}

/// Queue mailboxes vs reducing mailboxes on the same graph.
fn bench_message_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_strategy");
    group.sample_size(20);

    let graph = uniform_graph(20_000, 4, 0xF00D).expect("bench graph");
    group.bench_function("queue_sssp", |b| {
        b.iter(|| {
            let result = run(&graph, &ShortestPaths::new(0), None, config(4, 200))
                .expect("sssp runs");
            criterion::black_box(result)
        });
    });
    group.bench_function("reducing_components", |b| {
        b.iter(|| {
            let result = run(&graph, &ConnectedComponents, None, config(4, 200))
                .expect("components run");
            criterion::black_box(result)
        });
    });
    group.finish();
}

/// Range vs degree partitioning where a handful of hubs own most edges.
fn bench_partitioning(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioning_hubs");
    group.sample_size(20);

    let graph = hub_graph(50_000, 16, 0xB0B).expect("bench graph");
    for partitioning in [Partitioning::Range, Partitioning::Degree] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{partitioning:?}")),
            &partitioning,
            |b, &p| {
                b.iter(|| {
                    let result = run(
                        &graph,
                        &PageRank::default(),
                        None,
                        config(4, 10).with_partitioning(p),
                    )
                    .expect("page rank runs");
                    criterion::black_box(result)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_page_rank,
    bench_worker_scaling,
    bench_message_strategy,
    bench_partitioning
);
criterion_main!(benches);
