#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use protkmer::config::IndexConfig;
use protkmer::index::KmerIndex;

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn random_proteins(n: usize, len: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            (0..len)
                .map(|_| AMINO_ACIDS[rng.gen_range(0..AMINO_ACIDS.len())])
                .collect()
        })
        .collect()
}

fn build_index(proteins: &[Vec<u8>], ksize: usize) -> KmerIndex<usize> {
    let index =
        KmerIndex::new(&IndexConfig::builder().ksize(ksize).build()).expect("valid ksize");
    for (i, seq) in proteins.iter().enumerate() {
        index.add_protein(seq, i).expect("valid protein");
    }
    index
}

fn add_bench(c: &mut Criterion) {
    let proteins = random_proteins(1_000, 300);

    let mut group = c.benchmark_group("add_protein");
    group.throughput(Throughput::Elements(proteins.len() as u64));
    for ksize in [5, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(ksize), &ksize, |b, &ksize| {
            b.iter(|| build_index(&proteins, ksize))
        });
    }
    group.finish();
}

fn find_bench(c: &mut Criterion) {
    let proteins = random_proteins(2_000, 300);
    let index = build_index(&proteins, 8);
    let queries: Vec<Vec<u8>> = proteins.iter().step_by(20).cloned().collect();

    let mut group = c.benchmark_group("find");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("closest", |b| {
        b.iter(|| {
            for q in &queries {
                index.find_closest(q).expect("valid query");
            }
        })
    });
    group.bench_function("close", |b| {
        b.iter(|| {
            for q in &queries {
                index.find_close(q, 0.1).expect("valid query");
            }
        })
    });
    group.bench_function("closest_many", |b| {
        b.iter(|| index.find_closest_many(&queries).expect("valid queries"))
    });
    group.finish();
}

criterion_group!(benches, add_bench, find_bench);
criterion_main!(benches);
