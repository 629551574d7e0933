use crate::models::{ComunaSeries, Observation, RawDataset, SeriesRecord, StationAssignment};
use chrono::Datelike;
use tracing::{info, warn};

/// Joins station observations onto comuna assignments.
///
/// Output follows assignment order; within a comuna rows keep the station's
/// input order. A comuna whose station has no observations contributes no
/// rows at all.
pub struct SeriesMaterializer;

impl SeriesMaterializer {
    pub fn new() -> Self {
        Self
    }

    pub fn materialize(&self, assignments: &[StationAssignment], dataset: &RawDataset) -> ComunaSeries {
        let by_station = dataset.observations_by_station();
        let mut records = Vec::new();
        let mut absent = 0usize;

        for assignment in assignments {
            match by_station.get(assignment.station_code.as_str()) {
                Some(observations) => {
                    records.extend(
                        observations
                            .iter()
                            .map(|observation| Self::to_record(assignment, observation)),
                    );
                }
                None => {
                    absent += 1;
                    warn!(
                        "Comuna {} dropped: station {} ({}) has no observations",
                        assignment.comuna, assignment.station_code, assignment.station_name
                    );
                }
            }
        }

        info!(
            "Materialized {} rows for {} comunas ({} without data)",
            records.len(),
            assignments.len() - absent,
            absent
        );

        ComunaSeries::new(records)
    }

    fn to_record(assignment: &StationAssignment, observation: &Observation) -> SeriesRecord {
        let date = observation.date;
        SeriesRecord {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            temperature: observation.temperature,
            station_name: assignment.station_name.clone(),
            latitude: assignment.station_latitude,
            longitude: assignment.station_longitude,
            region: assignment.station_region,
            station_code: assignment.station_code.clone(),
            date,
            comuna: assignment.comuna.clone(),
            distance_km: assignment.distance_km,
        }
    }
}

impl Default for SeriesMaterializer {
    fn default() -> Self {
        Self::new()
    }
}
