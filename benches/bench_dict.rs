use core::hint::black_box;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;

use rbkit::Dict;

fn bench_dict_vs_btreemap(c: &mut Criterion) {
  let keys: Vec<u32> = {
    let mut rng = StdRng::seed_from_u64(3);
    (0..10_000).map(|_| rng.random()).collect()
  };

  c.bench_function("dict_build", |b| {
    b.iter_batched(
      || keys.clone(),
      |keys| black_box(keys.into_iter().map(|k| (k, k)).collect::<Dict<u32, u32>>()),
      BatchSize::SmallInput,
    );
  });

  c.bench_function("btreemap_build", |b| {
    b.iter_batched(
      || keys.clone(),
      |keys| black_box(keys.into_iter().map(|k| (k, k)).collect::<BTreeMap<u32, u32>>()),
      BatchSize::SmallInput,
    );
  });

  let dict: Dict<u32, u32> = keys.iter().map(|&k| (k, k)).collect();
  c.bench_function("dict_get", |b| {
    let mut i = 0;
    b.iter(|| {
      i = (i + 1) % keys.len();
      black_box(dict.get(&keys[i]))
    });
  });
}

criterion_group!(dict_benches, bench_dict_vs_btreemap);
criterion_main!(dict_benches);
