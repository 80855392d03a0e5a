//! Generation, metric and lowering benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use padder_lower::{lower, Endianness};
use padder_topology::{registry, Topology, TopologyKind};

const WIDTHS: [usize; 3] = [16, 64, 256];

fn topologies() -> Vec<Topology> {
    registry::kinds()
        .filter(|kind| *kind != TopologyKind::RippleCarry)
        .map(TopologyKind::default_topology)
        .collect()
}

fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for topology in topologies() {
        for width in WIDTHS {
            group.throughput(Throughput::Elements(width as u64));
            group.bench_with_input(
                BenchmarkId::new(topology.name(), width),
                &width,
                |b, &width| b.iter(|| black_box(topology.generate(black_box(width)))),
            );
        }
    }

    group.finish();
}

fn benchmark_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for width in WIDTHS {
        let matrix = Topology::KoggeStone.generate(width).unwrap();
        group.bench_with_input(BenchmarkId::new("reachability", width), &matrix, |b, m| {
            b.iter(|| black_box(m.compute_reachability()))
        });
        group.bench_with_input(BenchmarkId::new("wiring", width), &matrix, |b, m| {
            b.iter(|| black_box(m.wiring_metrics()))
        });
    }

    group.finish();
}

fn benchmark_lowering(c: &mut Criterion) {
    let mut group = c.benchmark_group("lower");

    for width in WIDTHS {
        let matrix = Topology::Sklansky.generate(width).unwrap();
        group.throughput(Throughput::Elements(matrix.node_count() as u64));
        group.bench_with_input(BenchmarkId::new("sklansky", width), &matrix, |b, m| {
            b.iter(|| black_box(lower(m, Endianness::Little)))
        });
    }

    let dag = lower(&Topology::KoggeStone.generate(64).unwrap(), Endianness::Little);
    group.bench_function("simulate_64", |b| {
        b.iter(|| black_box(dag.simulate(black_box(u64::MAX as u128), black_box(12345))))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_generation,
    benchmark_metrics,
    benchmark_lowering
);
criterion_main!(benches);
