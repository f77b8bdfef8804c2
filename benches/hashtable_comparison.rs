use alloc::format;
use alloc::string::String;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use fib_hash::HashMap as FibHashMap;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

extern crate alloc;

#[derive(Clone, Copy, Default)]
struct SipBuilder;

impl BuildHasher for SipBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

trait BenchKey: Clone + Hash + Eq {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
    (1 << 17),
    (1 << 18),
];

fn make_keys<Key: BenchKey>(count: usize, start: u64, step: usize) -> Vec<Key> {
    (start..)
        .step_by(step)
        .take(count)
        .map(Key::new)
        .collect::<Vec<Key>>()
}

fn filled_fib<Key: BenchKey>(keys: &[Key]) -> FibHashMap<Key, u64, SipBuilder> {
    let mut map = FibHashMap::with_hasher(SipBuilder);
    for (value, key) in keys.iter().enumerate() {
        map.put(key.clone(), value as u64);
    }
    map
}

fn filled_hashbrown<Key: BenchKey>(keys: &[Key]) -> HashbrownHashMap<Key, u64, SipBuilder> {
    let mut map = HashbrownHashMap::with_hasher(SipBuilder);
    for (value, key) in keys.iter().enumerate() {
        map.insert(key.clone(), value as u64);
    }
    map
}

fn bench_insert_random<Key: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<Key>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = OsRng;

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = (0..*size)
            .map(|_| Key::new(rng.try_next_u64().unwrap()))
            .collect::<Vec<Key>>();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("fib_hash/{}", size), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut map = FibHashMap::with_hasher(SipBuilder);
                    for key in keys {
                        black_box(map.put(key, 0u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut map = HashbrownHashMap::with_hasher(SipBuilder);
                    for key in keys {
                        black_box(map.insert(key, 0u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_overwrite<Key: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("overwrite_{}", core::any::type_name::<Key>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = make_keys::<Key>(*size, 0, 1);
        let mut fib_map = filled_fib(&keys);
        let mut hashbrown_map = filled_hashbrown(&keys);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("fib_hash/{}", size), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    for key in keys {
                        black_box(fib_map.put(key, 1));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    for key in keys {
                        black_box(hashbrown_map.insert(key, 1));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit<Key: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<Key>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = make_keys::<Key>(*size, 0, 2);
        let fib_map = filled_fib(&keys);
        let hashbrown_map = filled_hashbrown(&keys);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("fib_hash/{}", size), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    for key in keys.iter() {
                        black_box(fib_map.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    for key in keys.iter() {
                        black_box(hashbrown_map.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_miss<Key: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_miss_{}", core::any::type_name::<Key>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = make_keys::<Key>(*size, 0, 2);
        let misses = make_keys::<Key>(*size, 1, 2);
        let fib_map = filled_fib(&keys);
        let hashbrown_map = filled_hashbrown(&keys);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("fib_hash/{}", size), |b| {
            b.iter(|| {
                for key in misses.iter() {
                    black_box(fib_map.get(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter(|| {
                for key in misses.iter() {
                    black_box(hashbrown_map.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_find_zipf<Key: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_zipf_{}", core::any::type_name::<Key>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = make_keys::<Key>(*size, 0, 1);
        let fib_map = filled_fib(&keys);
        let hashbrown_map = filled_hashbrown(&keys);

        let distr = Zipf::new(*size as f32, 1.0).unwrap();
        let mut rng = SmallRng::from_os_rng();
        let lookups = (0..*size)
            .map(|_| keys[rng.sample(&distr) as usize - 1].clone())
            .collect::<Vec<Key>>();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("fib_hash/{}", size), |b| {
            b.iter(|| {
                for key in lookups.iter() {
                    black_box(fib_map.get(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter(|| {
                for key in lookups.iter() {
                    black_box(hashbrown_map.get(key));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64, 8>,
    bench_insert_random::<String, 6>,
    bench_overwrite::<u64, 8>,
    bench_overwrite::<String, 6>,
    bench_find_hit::<u64, 8>,
    bench_find_hit::<String, 6>,
    bench_find_miss::<u64, 8>,
    bench_find_miss::<String, 6>,
    bench_find_zipf::<u64, 8>,
    bench_find_zipf::<String, 6>,
);

criterion_main!(benches);
