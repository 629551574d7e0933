use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::geometry::{CentroidCalculator, DistanceMatrix, DistanceMetric};
use crate::models::{Comuna, ComunaCentroid, Station, StationAssignment};
use crate::utils::constants::{DEFAULT_UTM_ZONE, KM_PER_DEGREE};
use tracing::{debug, info, warn};

/// Assigns every comuna to its nearest station.
///
/// Deterministic for a given input order: ties go to the station listed
/// first.
pub struct StationAssigner {
    centroids: CentroidCalculator,
    metric: DistanceMetric,
    km_per_degree: f64,
}

impl StationAssigner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            centroids: CentroidCalculator::for_zone(DEFAULT_UTM_ZONE)?,
            metric: DistanceMetric::EuclideanDegrees,
            km_per_degree: KM_PER_DEGREE,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            centroids: CentroidCalculator::for_zone(config.utm_zone)?,
            metric: config.distance_metric,
            km_per_degree: config.km_per_degree,
        })
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Compute centroids from comuna geometry, then assign
    pub fn assign(&self, comunas: &[Comuna], stations: &[Station]) -> Result<Vec<StationAssignment>> {
        let centroids = self.centroids.compute_all(comunas)?;
        self.assign_centroids(&centroids, stations)
    }

    /// Assign comunas whose centroids are already known
    pub fn assign_centroids(
        &self,
        centroids: &[ComunaCentroid],
        stations: &[Station],
    ) -> Result<Vec<StationAssignment>> {
        let candidates: Vec<(&Station, (f64, f64))> = stations
            .iter()
            .filter_map(|s| match s.coordinates() {
                Some(coords) => Some((s, coords)),
                None => {
                    warn!(
                        "Dropping station {} ({}) without coordinates",
                        s.code, s.name
                    );
                    None
                }
            })
            .collect();

        let located: Vec<&ComunaCentroid> = centroids
            .iter()
            .filter(|c| {
                let valid = c.has_valid_coordinates();
                if !valid {
                    warn!("Dropping comuna {} without a usable centroid", c.name);
                }
                valid
            })
            .collect();

        if located.is_empty() {
            return Ok(Vec::new());
        }

        if candidates.is_empty() {
            return Err(ProcessingError::NoStationAvailable {
                comuna: located[0].name.clone(),
            });
        }

        let origins: Vec<(f64, f64)> = located.iter().map(|c| (c.latitude, c.longitude)).collect();
        let targets: Vec<(f64, f64)> = candidates.iter().map(|(_, coords)| *coords).collect();
        let matrix = DistanceMatrix::compute(&origins, &targets, self.metric, self.km_per_degree);

        let mut assignments = Vec::with_capacity(located.len());
        for (row, centroid) in located.iter().enumerate() {
            let (col, distance_km) =
                matrix.argmin(row).ok_or_else(|| ProcessingError::NoStationAvailable {
                    comuna: centroid.name.clone(),
                })?;

            let station = candidates[col].0;
            debug!(
                "{} -> {} ({}) at {:.2} km",
                centroid.name, station.name, station.code, distance_km
            );

            let assignment = StationAssignment::from_station(centroid.name.clone(), station, distance_km)
                .ok_or_else(|| ProcessingError::NoStationAvailable {
                    comuna: centroid.name.clone(),
                })?;
            assignments.push(assignment);
        }

        info!(
            "Assigned {} comunas to {} candidate stations",
            assignments.len(),
            candidates.len()
        );

        Ok(assignments)
    }
}
