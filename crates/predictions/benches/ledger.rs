use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use predictions::{AssetType, NewPrediction, PredictionLedger, DEFAULT_CAPACITY};
use time::OffsetDateTime;

const BENCH_INSERTS: u64 = 10_000;

fn new_prediction(i: u64, created_at: OffsetDateTime) -> NewPrediction {
    NewPrediction {
        asset_type: if i % 2 == 0 {
            AssetType::Index
        } else {
            AssetType::Crypto
        },
        symbol: None,
        created_at,
        observed_value: 16_000.0 + i as f64,
        predicted_value: 16_050.0 + i as f64,
        confidence: 70.0,
        horizon: "24h".to_string(),
    }
}

fn bench_ledger(c: &mut Criterion) {
    let created_at = OffsetDateTime::UNIX_EPOCH;

    let mut group = c.benchmark_group("ledger");
    group.throughput(Throughput::Elements(BENCH_INSERTS));
    group.bench_function(BenchmarkId::new("insert_with_eviction", BENCH_INSERTS), |b| {
        b.iter(|| {
            let ledger = PredictionLedger::default();
            for i in 0..BENCH_INSERTS {
                black_box(ledger.insert(new_prediction(i, created_at)));
            }
        });
    });
    group.finish();

    let ledger = PredictionLedger::default();
    for i in 0..DEFAULT_CAPACITY as u64 {
        ledger.insert(new_prediction(i, created_at));
    }
    c.bench_function("ledger_list_filtered_page", |b| {
        b.iter(|| black_box(ledger.list(Some(AssetType::Crypto), 100, 50)));
    });
}

criterion_group!(benches, bench_ledger);
criterion_main!(benches);
