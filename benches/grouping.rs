//! Benchmarks for the grouping engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use node_group::{group_pairs, Identifier, IdentifierPair};

const KINDS: [&str; 4] = ["email", "device", "cookie", "phone"];

/// `count` random links over roughly `count / 2` identifiers
fn random_pairs(count: usize, seed: u64) -> Vec<IdentifierPair> {
    let mut rng = StdRng::seed_from_u64(seed);
    let universe = (count / 2).max(1);
    let node = |rng: &mut StdRng| {
        let kind = KINDS[rng.gen_range(0..KINDS.len())];
        Identifier::new(kind, rng.gen_range(0..universe).to_string()).unwrap()
    };
    (0..count)
        .map(|_| {
            let a = node(&mut rng);
            let b = node(&mut rng);
            IdentifierPair::new(a, b)
        })
        .collect()
}

/// A single path a - b - c - ... of `count` links
fn chain_pairs(count: usize) -> Vec<IdentifierPair> {
    (0..count)
        .map(|i| {
            IdentifierPair::new(
                Identifier::new("node", i.to_string()).unwrap(),
                Identifier::new("node", (i + 1).to_string()).unwrap(),
            )
        })
        .collect()
}

fn bench_group_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_random");
    for size in [1_000usize, 10_000, 100_000] {
        let pairs = random_pairs(size, 7);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pairs, |b, pairs| {
            b.iter(|| group_pairs(black_box(pairs)))
        });
    }
    group.finish();
}

fn bench_group_chain(c: &mut Criterion) {
    let pairs = chain_pairs(100_000);
    c.bench_function("group_chain_100k", |b| {
        b.iter(|| group_pairs(black_box(&pairs)))
    });
}

fn bench_pair_parse(c: &mut Criterion) {
    let canonical = "email::alice@example.com$device::3f2b-11ee-9a0c";
    c.bench_function("pair_parse", |b| {
        b.iter(|| IdentifierPair::parse(black_box(canonical)))
    });
}

criterion_group!(benches, bench_group_random, bench_group_chain, bench_pair_parse);
criterion_main!(benches);
