use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use forecast::forecast;
use rand::{rngs::StdRng, SeedableRng};

const HISTORY_LENGTHS: [usize; 3] = [5, 20, 500];

fn synthetic_history(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 16_000.0 * (1.0 + 0.0005 * i as f64) + (i % 7) as f64 * 3.5)
        .collect()
}

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");

    for len in HISTORY_LENGTHS {
        let history = synthetic_history(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("trend", len), &history, |b, history| {
            let mut rng = StdRng::seed_from_u64(11);
            b.iter(|| black_box(forecast(black_box(history), 5.0, &mut rng)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forecast);
criterion_main!(benches);
