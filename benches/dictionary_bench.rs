//! Criterion benchmarks for the stem tree, edit distance and stem resolution.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use synodict::similarity::{levenshtein, similarity};
use synodict::tree::StemTree;
use synodict::Dictionary;

fn words(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("stem{:07}", (i * 7919) % size)).collect()
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("stem_tree");

    for size in [1000, 10000, 100000] {
        let stems = words(size);

        group.bench_with_input(BenchmarkId::new("insert", size), &size, |b, _| {
            b.iter(|| {
                let mut tree = StemTree::new();
                for stem in &stems {
                    let _ = tree.insert(black_box(stem));
                }
                tree
            })
        });

        let mut tree = StemTree::new();
        for stem in &stems {
            let _ = tree.insert(stem);
        }

        group.bench_with_input(BenchmarkId::new("find", size), &size, |b, _| {
            b.iter(|| {
                for stem in stems.iter().step_by(97) {
                    black_box(tree.find(black_box(stem)));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("insert_remove", size), &size, |b, _| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for stem in stems.iter().step_by(7) {
                        let _ = tree.remove(black_box(stem));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_levenshtein(c: &mut Criterion) {
    let mut group = c.benchmark_group("levenshtein");

    let pairs = [
        ("short", "run", "running"),
        ("medium", "anticonstitutionnel", "anticonstitutionnellement"),
        ("disjoint", "abcdefghijklmnop", "qrstuvwxyz012345"),
    ];

    for (name, a, b) in pairs {
        group.bench_function(BenchmarkId::new("distance", name), |bench| {
            bench.iter(|| levenshtein(black_box(a), black_box(b)))
        });
        group.bench_function(BenchmarkId::new("similarity", name), |bench| {
            bench.iter(|| similarity(black_box(a), black_box(b)))
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_stem");

    for size in [100, 1000, 10000] {
        let mut dict = Dictionary::new();
        for stem in words(size) {
            dict.add_stem(&stem).unwrap();
            dict.add_inflection(&stem, &format!("{}s", stem)).unwrap();
        }
        let probe = format!("stem{:07}s", size / 2);

        group.bench_with_input(BenchmarkId::new("resolve", size), &size, |b, _| {
            b.iter(|| dict.resolve_stem(black_box(&probe)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tree, bench_levenshtein, bench_resolve);
criterion_main!(benches);
