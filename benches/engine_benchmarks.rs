use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geo::Point;
use netgap::{
    AnalysisConfig, CancelToken, Category, Engine, GridIndex, LocationRecord, LocationStore,
    find_gaps,
};

// Deterministic scatter over the Baku metro area.
fn synthetic_records(count: usize) -> Vec<LocationRecord> {
    let sources = ["Bank of Baku", "Kapital Bank", "ABB", "PASHA Bank"];
    (0..count)
        .map(|i| {
            let lat = 40.30 + ((i * 7919) % 10_000) as f64 * 0.00004;
            let lon = 49.70 + ((i * 104_729) % 10_000) as f64 * 0.00005;
            let category = if i % 10 == 9 {
                Category::Retail
            } else {
                Category::Atm
            };
            LocationRecord::new(
                format!("loc:{i}"),
                sources[i % sources.len()],
                category,
                lat,
                lon,
                format!("Street {i}"),
            )
        })
        .collect()
}

fn benchmark_grid_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_index");

    for size in [1_000, 10_000, 50_000].iter() {
        let records = synthetic_records(*size);
        let refs: Vec<&LocationRecord> = records.iter().collect();
        let index = GridIndex::build(&refs);
        let query = Point::new(49.85, 40.40);

        group.bench_with_input(BenchmarkId::new("build", size), size, |b, &_size| {
            b.iter(|| GridIndex::build(black_box(&refs)))
        });

        group.bench_with_input(BenchmarkId::new("nearest", size), size, |b, &_size| {
            b.iter(|| index.nearest(black_box(&query)))
        });

        group.bench_with_input(
            BenchmarkId::new("within_radius_2km", size),
            size,
            |b, &_size| b.iter(|| index.within_radius(black_box(&query), black_box(2.0))),
        );
    }

    group.finish();
}

fn benchmark_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage");

    for size in [1_000, 10_000].iter() {
        let records = synthetic_records(*size);
        let store = LocationStore::new(records).unwrap();
        let owners = store.owner_atms("Bank of Baku");
        let competitors = store.competitor_atms("Bank of Baku");

        group.bench_with_input(BenchmarkId::new("find_gaps", size), size, |b, &_size| {
            b.iter(|| {
                find_gaps(
                    black_box(&competitors),
                    black_box(&owners),
                    black_box(2.0),
                    black_box(1.0),
                )
            })
        });
    }

    group.finish();
}

fn benchmark_full_analyses(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analyses");
    group.sample_size(10);

    let store = Arc::new(LocationStore::new(synthetic_records(5_000)).unwrap());
    let engine = Engine::new(store, AnalysisConfig::new("Bank of Baku")).unwrap();

    group.bench_function("roi_rankings", |b| b.iter(|| engine.roi_rankings()));

    group.bench_function("retail_opportunities", |b| {
        b.iter(|| engine.retail_opportunities())
    });

    group.bench_function("colocation_matrix", |b| {
        let cancel = CancelToken::new();
        b.iter(|| engine.colocation_matrix(black_box(&cancel)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_grid_index,
    benchmark_coverage,
    benchmark_full_analyses
);

criterion_main!(benches);
