use chrono::{Datelike, NaiveDate};
use comuna_temps::geometry::UtmProjection;
use comuna_temps::models::{ComunaCentroid, ComunaSeries, SeriesRecord, Station};
use comuna_temps::processors::{GapAnalyzer, StationAssigner};
use comuna_temps::reconstruction::{ReconstructionMethod, Reconstructor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Synthetic region: `comunas` series of `days` days with every fifth value missing
fn create_test_series(comunas: usize, days: usize) -> ComunaSeries {
    let base_date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let mut records = Vec::with_capacity(comunas * days);

    for c in 0..comunas {
        for day in 0..days {
            let date = base_date + chrono::Duration::days(day as i64);
            let seasonal = 14.0 + 7.0 * ((date.ordinal() as f32) / 58.0).cos();
            let temperature = if (day + c) % 5 == 0 {
                None
            } else {
                Some(seasonal + c as f32 * 0.1)
            };

            records.push(SeriesRecord {
                year: date.year(),
                month: date.month(),
                day: date.day(),
                temperature,
                station_name: format!("Estación {}", c % 12),
                latitude: -33.2 - (c % 12) as f64 * 0.05,
                longitude: -70.5 - (c % 12) as f64 * 0.04,
                region: 13,
                station_code: format!("{}", 330000 + c % 12),
                date,
                comuna: format!("Comuna {}", c),
                distance_km: 1.0 + (c % 7) as f64,
            });
        }
    }

    ComunaSeries::new(records)
}

fn benchmark_reconstruction_methods(c: &mut Criterion) {
    let series = create_test_series(52, 365);
    let mut group = c.benchmark_group("reconstruction");

    for method in [
        ReconstructionMethod::Linear,
        ReconstructionMethod::Seasonal,
        ReconstructionMethod::Knn,
    ] {
        group.bench_with_input(BenchmarkId::new("method", method), &method, |b, &method| {
            let reconstructor = Reconstructor::new(method);
            b.iter(|| black_box(reconstructor.reconstruct(series.clone()).missing_count()))
        });
    }

    group.finish();
}

fn benchmark_station_assignment(c: &mut Criterion) {
    let stations: Vec<Station> = (0..40)
        .map(|i| {
            Station::new(
                format!("{}", 330000 + i),
                format!("Estación {}", i),
                Some(-33.0 - (i as f64) * 0.03),
                Some(-70.3 - (i % 8) as f64 * 0.1),
                13,
            )
        })
        .collect();
    let centroids: Vec<ComunaCentroid> = (0..52)
        .map(|i| {
            ComunaCentroid::new(
                format!("Comuna {}", i),
                -33.1 - (i as f64) * 0.02,
                -70.4 - (i % 10) as f64 * 0.07,
            )
        })
        .collect();
    let assigner = StationAssigner::new().unwrap();

    c.bench_function("station_assignment", |b| {
        b.iter(|| black_box(assigner.assign_centroids(&centroids, &stations).map(|a| a.len())))
    });
}

fn benchmark_utm_projection(c: &mut Criterion) {
    let projection = UtmProjection::south(19).unwrap();
    let points: Vec<(f64, f64)> = (0..1000)
        .map(|i| (-33.0 - (i as f64) * 0.001, -70.0 - (i as f64) * 0.001))
        .collect();

    c.bench_function("utm_round_trip", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for &(lat, lon) in &points {
                let (e, n) = projection.forward(lat, lon);
                let (lat2, _) = projection.inverse(e, n);
                sum += lat2;
            }
            black_box(sum)
        })
    });
}

fn benchmark_gap_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_analysis_by_size");

    for &comunas in &[10, 52, 200] {
        let series = create_test_series(comunas, 365);
        group.bench_with_input(BenchmarkId::new("comunas", comunas), &series, |b, series| {
            let analyzer = GapAnalyzer::new();
            b.iter(|| black_box(analyzer.analyze(series).gaps.len()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_reconstruction_methods,
    benchmark_station_assignment,
    benchmark_utm_projection,
    benchmark_gap_analysis
);
criterion_main!(benches);
