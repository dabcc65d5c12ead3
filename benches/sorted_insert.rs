use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flat_collections::FlatSet;
use rand::{seq::SliceRandom, SeedableRng};

fn plain_insert(values: &[u32]) -> usize {
    let mut res: FlatSet<[u32; 4]> = FlatSet::new();
    for v in values {
        res.insert(*v);
    }
    res.len()
}

fn hinted_end_insert(values: &[u32]) -> usize {
    let mut res: FlatSet<[u32; 4]> = FlatSet::new();
    for v in values {
        res.insert_hint(res.len(), *v);
    }
    res.len()
}

fn btree_insert(values: &[u32]) -> usize {
    let mut res: BTreeSet<u32> = BTreeSet::new();
    for v in values {
        res.insert(*v);
    }
    res.len()
}

fn insert_bench(c: &mut Criterion, title: &str, shuffled: bool) {
    let mut group = c.benchmark_group(format!("Insert {}", title));
    let mut rand = rand::rngs::StdRng::from_seed([0u8; 32]);
    for i in [100u32, 1000, 10000].iter() {
        let mut values = (0..*i).collect::<Vec<_>>();
        if shuffled {
            values.shuffle(&mut rand);
        }

        group.bench_with_input(
            BenchmarkId::new("FlatSet plain", i),
            &values,
            |b, values| b.iter(|| plain_insert(black_box(values))),
        );

        group.bench_with_input(
            BenchmarkId::new("FlatSet hinted end", i),
            &values,
            |b, values| b.iter(|| hinted_end_insert(black_box(values))),
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeSet", i),
            &values,
            |b, values| b.iter(|| btree_insert(black_box(values))),
        );
    }
}

pub fn insert_sorted(c: &mut Criterion) {
    insert_bench(c, "sorted", false)
}

pub fn insert_shuffled(c: &mut Criterion) {
    insert_bench(c, "shuffled", true)
}

criterion_group!(benches, insert_sorted, insert_shuffled);
criterion_main!(benches);
