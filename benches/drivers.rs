use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use sortviz::{sort_unpaced, Algorithm, ArrayGenerator, Limits};

fn bench_unpaced_drivers(c: &mut Criterion) {
    let limits = Limits::default();
    let input = ArrayGenerator::with_seed(7).generate(limits.max_array_size, limits.value_range());

    let mut group = c.benchmark_group("drivers_unpaced");
    group.throughput(Throughput::Elements(input.len() as u64));
    for algo in Algorithm::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(algo), &input, |b, input| {
            b.iter(|| black_box(sort_unpaced(algo, black_box(input))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unpaced_drivers);
criterion_main!(benches);
