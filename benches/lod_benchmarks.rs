use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use obsgrid::{
    Config, MultiResolutionIndex, ObservationPoint, RawObservation, RenderMode, SelectionState,
    SourceDetails, plan_frame, sanitize, sanitize_json,
};
use serde_json::json;

fn points(n: usize) -> Vec<ObservationPoint> {
    (0..n)
        .map(|i| {
            let lat = 40.7128 + ((i % 997) as f64 * 0.0013);
            let lon = -74.0060 + ((i / 997) as f64 * 0.0021);
            ObservationPoint::new(
                i.to_string(),
                lat,
                lon,
                SourceDetails::primary("Columba livia", Some("Rock pigeon")),
            )
        })
        .collect()
}

fn benchmark_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [1_000, 10_000, 50_000] {
        let data = points(size);
        group.bench_with_input(BenchmarkId::new("build", size), &data, |b, data| {
            b.iter(|| MultiResolutionIndex::build(black_box(data.clone())))
        });
    }

    group.finish();
}

fn benchmark_plan_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_frame");

    let index = MultiResolutionIndex::build(points(10_000));
    let selection = SelectionState::new();
    let config = Config::default();

    for zoom in [4.0, 7.0, 9.0, 11.0, 14.0] {
        group.bench_with_input(BenchmarkId::new("aggregate", zoom), &zoom, |b, &zoom| {
            b.iter(|| {
                plan_frame(
                    black_box(&index),
                    black_box(zoom),
                    RenderMode::Aggregate,
                    &selection,
                    &config,
                )
            })
        });
    }

    // Realtime draws every point regardless of zoom
    group.bench_function("realtime", |b| {
        b.iter(|| {
            plan_frame(
                black_box(&index),
                black_box(9.0),
                RenderMode::Realtime,
                &selection,
                &config,
            )
        })
    });

    group.finish();
}

fn benchmark_sanitize(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize");

    let records: Vec<RawObservation> = (0..10_000)
        .map(|i| {
            let coords = if i % 10 == 0 {
                (None, Some(1.0))
            } else {
                (Some(i as f64 * 0.0001), Some(-(i as f64) * 0.0001))
            };
            RawObservation::new(
                i.to_string(),
                coords.0,
                coords.1,
                SourceDetails::bird_checklist("Passer domesticus", None),
            )
        })
        .collect();
    group.bench_function("typed_10k", |b| {
        b.iter(|| sanitize(black_box(records.clone())))
    });

    let values: Vec<_> = (0..10_000)
        .map(|i| {
            json!({
                "id": i,
                "source": if i % 3 == 0 { "bird-checklist" } else { "primary" },
                "latitude": i as f64 * 0.0001,
                "longitude": if i % 10 == 0 { json!("n/a") } else { json!(i as f64 * 0.0002) },
                "scientific_name": "Sturnus vulgaris",
            })
        })
        .collect();
    group.bench_function("json_10k", |b| b.iter(|| sanitize_json(black_box(&values))));

    group.finish();
}

criterion_group!(
    benches,
    benchmark_index_build,
    benchmark_plan_frame,
    benchmark_sanitize
);

criterion_main!(benches);
