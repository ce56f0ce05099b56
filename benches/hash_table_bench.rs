use chain_hashtable::HashTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (HashTable<u64>, Vec<String>) {
    let mut t = HashTable::new(16).unwrap();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.insert(k.as_str(), i as u64);
    }
    (t, keys)
}

fn bench_insert_growing_100k(c: &mut Criterion) {
    c.bench_function("table::insert_growing_100k", |b| {
        b.iter_batched(
            || HashTable::<u64>::new(1).unwrap(),
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.insert(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("table::insert_presized_100k", |b| {
        b.iter_batched(
            || HashTable::<u64>::new(131_072).unwrap(),
            |mut t| {
                for (i, x) in lcg(2).take(100_000).enumerate() {
                    t.insert(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_overwrite_10k(c: &mut Criterion) {
    c.bench_function("table::overwrite_10k_on_100k", |b| {
        b.iter_batched(
            || filled(3, 100_000),
            |(mut t, keys)| {
                for (i, k) in keys.iter().take(10_000).enumerate() {
                    t.insert(k.as_str(), i as u64 + 1);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("table::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (t, keys) = filled(5, 110_000);
                // Precompute 10k unique victims via LCG
                let n = keys.len();
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                while sel.len() < 10_000 {
                    s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((s as usize) % n);
                }
                let victims: Vec<String> = sel.into_iter().map(|i| keys[i].clone()).collect();
                (t, victims)
            },
            |(mut t, victims)| {
                for k in &victims {
                    black_box(t.remove(k));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_retrieve_hit_10k(c: &mut Criterion) {
    c.bench_function("table::retrieve_hit_10k_on_100k", |b| {
        let (t, keys) = filled(7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(t.retrieve(k));
            }
        })
    });
}

fn bench_retrieve_miss_10k(c: &mut Criterion) {
    c.bench_function("table::retrieve_miss_10k_on_100k", |b| {
        let (t, _keys) = filled(11, 100_000);
        let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
        b.iter(|| {
            for k in &misses {
                black_box(t.retrieve(k));
            }
        })
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    c.bench_function("table::iter_all_100k", |b| {
        let (t, _keys) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in t.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_growing_100k, bench_insert_presized_100k, bench_overwrite_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_retrieve_hit_10k,
              bench_retrieve_miss_10k,
              bench_iter_100k
}
criterion_main!(benches_insert, benches_ops);
