use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One row of a comuna's daily series: the observation of its assigned
/// station re-labelled with the comuna and the assignment distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(rename = "Año")]
    pub year: i32,

    #[serde(rename = "Mes")]
    pub month: u32,

    #[serde(rename = "Dias")]
    pub day: u32,

    #[serde(rename = "Temperatura_Media")]
    pub temperature: Option<f32>,

    #[serde(rename = "Nombre_Estacion")]
    pub station_name: String,

    #[serde(rename = "Latitud")]
    pub latitude: f64,

    #[serde(rename = "Longitud")]
    pub longitude: f64,

    #[serde(rename = "Region")]
    pub region: u32,

    #[serde(rename = "Codigo_Estacion")]
    pub station_code: String,

    #[serde(rename = "Fecha")]
    pub date: NaiveDate,

    #[serde(rename = "Comuna")]
    pub comuna: String,

    #[serde(rename = "Distancia_Estacion_km")]
    pub distance_km: f64,
}

impl SeriesRecord {
    pub fn is_missing(&self) -> bool {
        self.temperature.is_none()
    }

    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }
}

/// Materialized per-comuna series for the whole region, in materialization
/// order. Reconstruction only ever replaces `None` temperatures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComunaSeries {
    records: Vec<SeriesRecord>,
}

impl ComunaSeries {
    pub fn new(records: Vec<SeriesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SeriesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_missing()).count()
    }

    pub fn missing_percentage(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        100.0 * self.missing_count() as f64 / self.records.len() as f64
    }

    /// Comuna names in first-seen order
    pub fn comunas(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.comuna.as_str()))
            .map(|r| r.comuna.as_str())
            .collect()
    }

    pub fn temperatures(&self) -> Vec<Option<f32>> {
        self.records.iter().map(|r| r.temperature).collect()
    }

    /// Write filled values into rows that are still missing; rows that
    /// already hold a value are never touched.
    pub fn apply_fills(&mut self, fills: impl IntoIterator<Item = (usize, f32)>) -> usize {
        let mut applied = 0;
        for (index, value) in fills {
            if let Some(record) = self.records.get_mut(index) {
                if record.temperature.is_none() && value.is_finite() {
                    record.temperature = Some(value);
                    applied += 1;
                }
            }
        }
        applied
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Series row with fixed station metadata, for tests
    pub fn record(comuna: &str, date: NaiveDate, temperature: Option<f32>) -> SeriesRecord {
        SeriesRecord {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            temperature,
            station_name: "Quinta Normal".to_string(),
            latitude: -33.445,
            longitude: -70.683,
            region: 13,
            station_code: "330020".to_string(),
            date,
            comuna: comuna.to_string(),
            distance_km: 2.5,
        }
    }

    /// Consecutive daily rows starting on the given date
    pub fn daily(comuna: &str, start: NaiveDate, values: &[Option<f32>]) -> Vec<SeriesRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| record(comuna, start + chrono::Duration::days(i as i64), *v))
            .collect()
    }
}
