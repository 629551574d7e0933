use crate::models::Station;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Daily mean temperature reported by one station; `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station_code: String,
    pub date: NaiveDate,
    pub temperature: Option<f32>,
}

impl Observation {
    pub fn new(station_code: String, date: NaiveDate, temperature: Option<f32>) -> Self {
        Self {
            station_code,
            date,
            temperature,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.temperature.is_none()
    }
}

/// Raw station data for one pipeline run: the station catalog and every
/// observation, at most one per (station, date).
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub stations: Vec<Station>,
    pub observations: Vec<Observation>,
}

impl RawDataset {
    pub fn new(stations: Vec<Station>, observations: Vec<Observation>) -> Self {
        Self {
            stations,
            observations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.observations.iter().filter(|o| o.is_missing()).count()
    }

    /// Observations grouped by station code, each group in input order
    pub fn observations_by_station(&self) -> HashMap<&str, Vec<&Observation>> {
        let mut grouped: HashMap<&str, Vec<&Observation>> = HashMap::new();
        for observation in &self.observations {
            grouped
                .entry(observation.station_code.as_str())
                .or_default()
                .push(observation);
        }
        grouped
    }
}
