use crate::error::{ProcessingError, Result};
use crate::utils::coordinates::{euclidean_degree_distance, haversine_distance};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How distances between comuna centroids and stations are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance in degrees times a fixed km-per-degree factor
    #[default]
    EuclideanDegrees,
    /// Great-circle distance
    Haversine,
}

impl FromStr for DistanceMetric {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "euclidean_degrees" | "euclidean" => Ok(DistanceMetric::EuclideanDegrees),
            "haversine" => Ok(DistanceMetric::Haversine),
            other => Err(ProcessingError::Config(format!(
                "Unsupported distance metric: {}",
                other
            ))),
        }
    }
}

/// Dense origins × targets matrix of distances in kilometres, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Both point sets are (latitude, longitude) in WGS84 degrees
    pub fn compute(
        origins: &[(f64, f64)],
        targets: &[(f64, f64)],
        metric: DistanceMetric,
        km_per_degree: f64,
    ) -> Self {
        let mut values = Vec::with_capacity(origins.len() * targets.len());

        for &(lat1, lon1) in origins {
            for &(lat2, lon2) in targets {
                let d = match metric {
                    DistanceMetric::EuclideanDegrees => {
                        euclidean_degree_distance(lat1, lon1, lat2, lon2, km_per_degree)
                    }
                    DistanceMetric::Haversine => haversine_distance(lat1, lon1, lat2, lon2),
                };
                values.push(d);
            }
        }

        Self {
            rows: origins.len(),
            cols: targets.len(),
            values,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Column index and value of the smallest entry in a row. Ties keep the
    /// first column; NaN entries are never selected.
    pub fn argmin(&self, row: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (col, &d) in self.row(row).iter().enumerate() {
            if d.is_nan() {
                continue;
            }
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((col, d)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_shape_and_values() {
        let origins = [(-33.0, -70.0), (-34.0, -71.0)];
        let targets = [(-33.0, -70.0), (-33.0, -71.0), (-34.0, -71.0)];

        let matrix = DistanceMatrix::compute(&origins, &targets, DistanceMetric::EuclideanDegrees, 111.0);

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.get(0, 0), 0.0);
        assert!((matrix.get(0, 1) - 111.0).abs() < 1e-9);
        assert_eq!(matrix.row(1).len(), 3);
    }

    #[test]
    fn test_argmin_prefers_first_on_ties() {
        let origins = [(0.0, 0.0)];
        let targets = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];

        let matrix = DistanceMatrix::compute(&origins, &targets, DistanceMetric::EuclideanDegrees, 111.0);

        assert_eq!(matrix.argmin(0), Some((0, 111.0)));
    }

    #[test]
    fn test_argmin_empty_row() {
        let matrix = DistanceMatrix::compute(&[(0.0, 0.0)], &[], DistanceMetric::Haversine, 111.0);
        assert_eq!(matrix.argmin(0), None);
    }

    #[test]
    fn test_haversine_metric() {
        let matrix = DistanceMatrix::compute(
            &[(-33.0, -70.0)],
            &[(-34.0, -70.0)],
            DistanceMetric::Haversine,
            111.0,
        );
        assert!((matrix.get(0, 0) - 111.19).abs() < 0.1);
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("haversine".parse::<DistanceMetric>().unwrap(), DistanceMetric::Haversine);
        assert_eq!(
            "Euclidean_Degrees".parse::<DistanceMetric>().unwrap(),
            DistanceMetric::EuclideanDegrees
        );
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }
}
