use crate::models::SeriesRecord;
use crate::reconstruction::grouping::group_by_date;
use crate::reconstruction::GapFiller;
use crate::utils::constants::DEFAULT_KNN_NEIGHBORS;
use rayon::prelude::*;

/// Columns in the imputation matrix: latitude, longitude, distance, temperature
const TOTAL_COLUMNS: f64 = 4.0;
/// Columns a missing-temperature row shares with its donors
const SHARED_COLUMNS: f64 = 3.0;

/// Cross-sectional K-nearest-neighbor imputation.
///
/// Each date is imputed on its own: a comuna missing that day borrows from
/// the comunas observed on the same date, ranked by distance in
/// (latitude, longitude, distance-to-station) space and weighted by inverse
/// distance. Dates with no observed comuna stay missing.
#[derive(Debug, Clone, Copy)]
pub struct KnnImputer {
    neighbors: usize,
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self::new(DEFAULT_KNN_NEIGHBORS)
    }
}

impl KnnImputer {
    pub fn new(neighbors: usize) -> Self {
        Self {
            neighbors: neighbors.max(1),
        }
    }

    fn features(record: &SeriesRecord) -> [f64; 3] {
        [record.latitude, record.longitude, record.distance_km]
    }

    /// Euclidean distance over the shared columns, rescaled to the full
    /// column count as for a partially observed row
    fn distance(a: &SeriesRecord, b: &SeriesRecord) -> f64 {
        let (fa, fb) = (Self::features(a), Self::features(b));
        let squared: f64 = fa.iter().zip(fb.iter()).map(|(x, y)| (x - y).powi(2)).sum();
        (squared * TOTAL_COLUMNS / SHARED_COLUMNS).sqrt()
    }

    fn impute_one(&self, records: &[SeriesRecord], receiver: usize, donors: &[usize]) -> Option<f32> {
        let mut ranked: Vec<(f64, usize)> = donors
            .iter()
            .map(|&d| (Self::distance(&records[receiver], &records[d]), d))
            .filter(|(dist, _)| !dist.is_nan())
            .collect();

        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        ranked.truncate(self.neighbors);

        if ranked.is_empty() {
            return None;
        }

        let value = |d: usize| records[d].temperature.map(f64::from).unwrap_or_default();

        // Exact matches take all the weight
        let exact: Vec<usize> = ranked
            .iter()
            .filter(|(dist, _)| *dist == 0.0)
            .map(|&(_, d)| d)
            .collect();

        let estimate = if !exact.is_empty() {
            exact.iter().map(|&d| value(d)).sum::<f64>() / exact.len() as f64
        } else {
            let (weighted, total) = ranked.iter().fold((0.0, 0.0), |(acc, w), &(dist, d)| {
                let weight = 1.0 / dist;
                (acc + weight * value(d), w + weight)
            });
            weighted / total
        };

        estimate.is_finite().then_some(estimate as f32)
    }

    fn fill_date(&self, records: &[SeriesRecord], indices: &[usize]) -> Vec<(usize, f32)> {
        let (donors, receivers): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| records[i].temperature.is_some());

        if receivers.is_empty() || donors.is_empty() {
            return Vec::new();
        }

        receivers
            .into_iter()
            .filter_map(|r| self.impute_one(records, r, &donors).map(|v| (r, v)))
            .collect()
    }
}

impl GapFiller for KnnImputer {
    fn name(&self) -> &'static str {
        "knn"
    }

    fn fill(&self, records: &[SeriesRecord]) -> Vec<(usize, f32)> {
        let dates: Vec<Vec<usize>> = group_by_date(records).into_values().collect();

        dates
            .par_iter()
            .flat_map_iter(|indices| self.fill_date(records, indices))
            .collect()
    }
}
