use crate::error::{ProcessingError, Result};
use crate::models::{Observation, Station};
use crate::utils::read_text_file;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One row of the observation export. Extra columns such as `Fecha` are
/// ignored; the date is rebuilt from `Año`, `Mes` and `Dias`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObservationRow {
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
    pub latitude: Option<f64>,

    #[serde(rename = "Longitud")]
    pub longitude: Option<f64>,

    #[serde(rename = "Region")]
    pub region: u32,

    #[serde(rename = "Codigo_Estacion")]
    pub station_code: String,
}

impl ObservationRow {
    pub fn date(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(
            ProcessingError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            },
        )
    }

    pub fn to_observation(&self) -> Result<Observation> {
        Ok(Observation::new(
            self.station_code.clone(),
            self.date()?,
            self.temperature.filter(|t| t.is_finite()),
        ))
    }

    pub fn to_station(&self) -> Station {
        Station::new(
            self.station_code.clone(),
            self.station_name.clone(),
            self.latitude,
            self.longitude,
            self.region,
        )
    }
}

pub struct ObservationReader;

impl ObservationReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_rows(&self, path: &Path) -> Result<Vec<ObservationRow>> {
        let text = read_text_file(path)?;
        let rows = self.parse_rows(&text)?;
        debug!("Read {} observation rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    pub fn parse_rows(&self, text: &str) -> Result<Vec<ObservationRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        reader
            .deserialize::<ObservationRow>()
            .map(|row| row.map_err(ProcessingError::from))
            .collect()
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Año,Mes,Dias,Temperatura_Media,Nombre_Estacion,Latitud,Longitud,Region,Codigo_Estacion,Fecha\n";

    #[test]
    fn test_parse_rows_with_nulls() {
        let text = format!(
            "{}{}{}",
            HEADER,
            "2023,1,15,21.4,Quinta Normal,-33.445,-70.683,13,330020,2023-01-15\n",
            "2023,1,16,,Quinta Normal,-33.445,-70.683,13,330020,2023-01-16\n"
        );

        let rows = ObservationReader::new().parse_rows(&text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].temperature, Some(21.4));
        assert_eq!(rows[1].temperature, None);

        let observation = rows[0].to_observation().unwrap();
        assert_eq!(observation.date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(rows[0].to_station().coordinates(), Some((-33.445, -70.683)));
    }

    #[test]
    fn test_invalid_date() {
        let text = format!(
            "{}2023,2,30,10.0,Quinta Normal,-33.445,-70.683,13,330020,\n",
            HEADER
        );

        let rows = ObservationReader::new().parse_rows(&text).unwrap();

        assert!(matches!(
            rows[0].to_observation(),
            Err(ProcessingError::InvalidDate { year: 2023, month: 2, day: 30 })
        ));
    }

    #[test]
    fn test_non_numeric_temperature_is_an_error() {
        let text = format!(
            "{}2023,1,1,abc,Quinta Normal,-33.445,-70.683,13,330020,\n",
            HEADER
        );

        assert!(matches!(
            ObservationReader::new().parse_rows(&text),
            Err(ProcessingError::Csv(_))
        ));
    }
}
