use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use marker_overlay::render::geometry::build_geometry;
use marker_overlay::{
    GeoPoint, MapReference, MarkerEvent, MarkerKey, MarkerRecord, MarkerShape, MarkerStore,
    OverlayOptions,
};
use std::hint::black_box;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn t(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn synthetic_record(ns: &str, id: i32, lifetime: Duration) -> Box<MarkerRecord> {
    Box::new(MarkerRecord {
        key: MarkerKey::new(ns, id),
        shape: MarkerShape::LineStrip,
        color: [0.2, 0.9, 0.2, 1.0],
        scale: Vec3::new(1.0, 1.0, 1.0),
        points: (0..16)
            .map(|i| Vec3::new(i as f32, (i % 4) as f32, 0.0))
            .collect(),
        text: String::new(),
        publish_time: t(100),
        lifetime,
        geo_position: GeoPoint::new(43.0 + id as f64 * 1e-5, -70.0, 0.0),
        yaw: 0.3,
        local_position: Vec2::ZERO,
    })
}

fn filled_store(marker_count: usize) -> MarkerStore {
    let mut store = MarkerStore::new();
    let map = MapReference::new(GeoPoint::new(43.1, -70.8, 0.0), 2.0);
    for index in 0..marker_count {
        let ns = match index % 3 {
            0 => "alpha",
            1 => "beta",
            _ => "gamma",
        };
        let lifetime = if index % 2 == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(30)
        };
        store.apply(
            MarkerEvent::Upsert(synthetic_record(ns, index as i32, lifetime)),
            t(100),
            Some(&map),
        );
    }
    store
}

fn bench_store_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_apply");
    for count in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let store = filled_store(black_box(count));
                black_box(store.marker_count())
            })
        });
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    c.bench_function("sweep_10k_halb_befristet", |b| {
        b.iter_batched(
            || filled_store(10_000),
            |mut store| {
                // Nach Ablauf der befristeten Hälfte
                black_box(store.sweep(t(200)))
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_geometry(c: &mut Criterion) {
    let store = filled_store(10_000);
    let options = OverlayOptions::default();

    c.bench_function("geometry_rebuild_10k", |b| {
        b.iter(|| {
            let mut shapes = 0usize;
            for record in store.records() {
                let geometry = build_geometry(record, black_box(2.0), 1.0, &options);
                shapes += usize::from(!matches!(
                    geometry,
                    marker_overlay::MarkerGeometry::Empty
                ));
            }
            black_box(shapes)
        })
    });
}

fn bench_reproject(c: &mut Criterion) {
    let neu = MapReference::new(GeoPoint::new(43.2, -70.9, 0.0), 1.0);

    c.bench_function("reproject_10k", |b| {
        b.iter_batched(
            || filled_store(10_000),
            |mut store| {
                store.reproject_all(&neu);
                black_box(store.marker_count())
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_store_apply,
    bench_sweep,
    bench_geometry,
    bench_reproject
);
criterion_main!(benches);
