use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isles::{MapConfig, Seed, TerrainMap};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("map-generation");
    group.sample_size(10);

    let config = MapConfig {
        seed: Seed::Int(0),
        num_cols: 500,
        num_rows: 500,
        smoothing_iterations: 5,
        ..Default::default()
    };
    group.bench_function("map gen", |b| {
        b.iter(|| TerrainMap::generate(black_box(config.clone())))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
