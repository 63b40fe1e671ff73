use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probe_graph::HashTable;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_insert_sequential(c: &mut Criterion) {
    c.bench_function("table::insert_sequential_100k", |b| {
        b.iter_batched(
            || HashTable::<u64>::new().unwrap(),
            |mut t| {
                for k in 0..100_000u64 {
                    *t.get_or_create(k).unwrap().get_mut() = k;
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
    // Baseline: SwissTable with its default hasher.
    c.bench_function("hashbrown::insert_sequential_100k", |b| {
        b.iter_batched(
            hashbrown::HashMap::<u64, u64>::new,
            |mut m| {
                for k in 0..100_000u64 {
                    *m.entry(k).or_default() = k;
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_random_presized(c: &mut Criterion) {
    c.bench_function("table::insert_random_presized_100k", |b| {
        b.iter_batched(
            || HashTable::<u64>::with_capacity(262_144).unwrap(),
            |mut t| {
                for (i, k) in lcg(1).take(100_000).enumerate() {
                    t.insert(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let keys: Vec<u64> = lcg(7).take(50_000).collect();
    let mut t = HashTable::<u64>::new().unwrap();
    let mut m = hashbrown::HashMap::<u64, u64>::new();
    for (i, &k) in keys.iter().enumerate() {
        t.insert(k, i as u64).unwrap();
        m.insert(k, i as u64);
    }

    c.bench_function("table::get_hit", |b| {
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = *it.next().unwrap();
            black_box(t.get(k));
        })
    });
    c.bench_function("hashbrown::get_hit", |b| {
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let mut t = HashTable::<u64>::new().unwrap();
    for (i, k) in lcg(11).take(50_000).enumerate() {
        t.insert(k, i as u64).unwrap();
    }
    c.bench_function("table::get_miss", |b| {
        let mut miss = lcg(0xdead_beef);
        b.iter(|| black_box(t.get(miss.next().unwrap())))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_sequential, bench_insert_random_presized, bench_get_hit, bench_get_miss
}
criterion_main!(benches);
