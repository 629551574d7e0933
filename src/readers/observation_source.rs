use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Observation, RawDataset, Station};
use crate::readers::{ObservationReader, ObservationRow};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where raw station observations come from.
///
/// Implementations return only the configured region and year range, and
/// `Ok(None)` when nothing matches.
pub trait ObservationSource: Send + Sync {
    fn fetch(&self, config: &PipelineConfig) -> Result<Option<RawDataset>>;
}

/// Observations read from a CSV export
pub struct CsvObservationSource {
    path: PathBuf,
}

impl CsvObservationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Filter parsed rows and derive the station catalog from them
    pub fn build_dataset(rows: &[ObservationRow], config: &PipelineConfig) -> Result<Option<RawDataset>> {
        let years = config.years();
        let mut stations: Vec<Station> = Vec::new();
        let mut known_stations: HashSet<&str> = HashSet::new();
        let mut seen: HashSet<(&str, NaiveDate)> = HashSet::new();
        let mut observations = Vec::new();
        let (mut foreign, mut out_of_range, mut duplicates) = (0usize, 0usize, 0usize);

        for row in rows {
            if row.region != config.region_code {
                foreign += 1;
                continue;
            }

            let observation = row.to_observation()?;
            if !years.contains(&observation.date.year()) {
                out_of_range += 1;
                continue;
            }
            if !seen.insert((row.station_code.as_str(), observation.date)) {
                duplicates += 1;
                continue;
            }

            if known_stations.insert(row.station_code.as_str()) {
                stations.push(row.to_station());
            }
            observations.push(observation);
        }

        debug!(
            "Dropped {} rows from other regions, {} outside {}..{}, {} duplicates",
            foreign, out_of_range, years.start, years.end, duplicates
        );

        if observations.is_empty() {
            return Ok(None);
        }

        Ok(Some(RawDataset::new(stations, observations)))
    }
}

impl ObservationSource for CsvObservationSource {
    fn fetch(&self, config: &PipelineConfig) -> Result<Option<RawDataset>> {
        let rows = ObservationReader::new().read_rows(&self.path)?;
        let dataset = Self::build_dataset(&rows, config)?;

        if let Some(ref dataset) = dataset {
            info!(
                "{}: {} observations from {} stations in region {}",
                self.path.display(),
                dataset.observations.len(),
                dataset.stations.len(),
                config.region_code
            );
        }

        Ok(dataset)
    }
}

/// An in-memory dataset is its own source
impl ObservationSource for RawDataset {
    fn fetch(&self, config: &PipelineConfig) -> Result<Option<RawDataset>> {
        let years = config.years();
        let stations: Vec<Station> = self
            .stations
            .iter()
            .filter(|s| s.is_in_region(config.region_code))
            .cloned()
            .collect();
        let codes: HashSet<&str> = stations.iter().map(|s| s.code.as_str()).collect();

        let mut seen: HashSet<(&str, NaiveDate)> = HashSet::new();
        let mut observations: Vec<Observation> = Vec::new();
        for observation in &self.observations {
            let code = observation.station_code.as_str();
            if codes.contains(code)
                && years.contains(&observation.date.year())
                && seen.insert((code, observation.date))
            {
                observations.push(observation.clone());
            }
        }

        if observations.is_empty() {
            return Ok(None);
        }

        Ok(Some(RawDataset::new(stations, observations)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
Año,Mes,Dias,Temperatura_Media,Nombre_Estacion,Latitud,Longitud,Region,Codigo_Estacion
2018,12,31,22.0,Quinta Normal,-33.445,-70.683,13,330020
2019,1,1,21.0,Quinta Normal,-33.445,-70.683,13,330020
2019,1,1,99.0,Quinta Normal,-33.445,-70.683,13,330020
2019,1,1,,Pudahuel,-33.393,-70.794,13,330021
2019,1,2,20.5,Quinta Normal,-33.445,-70.683,13,330020
2019,1,1,18.0,Valparaíso,-33.03,-71.63,5,320041
";

    fn rows() -> Vec<ObservationRow> {
        ObservationReader::new().parse_rows(CSV).unwrap()
    }

    #[test]
    fn test_build_dataset_filters_and_dedups() {
        let config = PipelineConfig::default();

        let dataset = CsvObservationSource::build_dataset(&rows(), &config).unwrap().unwrap();

        let codes: Vec<&str> = dataset.stations.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["330020", "330021"]);
        assert_eq!(dataset.observations.len(), 3);
        assert_eq!(dataset.observations[0].temperature, Some(21.0));
        assert_eq!(dataset.missing_count(), 1);
    }

    #[test]
    fn test_nothing_in_range_is_absent() {
        let config = PipelineConfig::default().with_years(Some(2000), Some(2010));
        assert!(CsvObservationSource::build_dataset(&rows(), &config).unwrap().is_none());
    }

    #[test]
    fn test_invalid_date_is_fatal() {
        let text = "Año,Mes,Dias,Temperatura_Media,Nombre_Estacion,Latitud,Longitud,Region,Codigo_Estacion\n2019,13,1,1.0,X,-33.0,-70.0,13,1\n";
        let rows = ObservationReader::new().parse_rows(text).unwrap();

        let result = CsvObservationSource::build_dataset(&rows, &PipelineConfig::default());
        assert!(matches!(result, Err(ProcessingError::InvalidDate { .. })));
    }

    #[test]
    fn test_invalid_date_in_other_region_is_ignored() {
        let text = "\
Año,Mes,Dias,Temperatura_Media,Nombre_Estacion,Latitud,Longitud,Region,Codigo_Estacion
2023,2,28,19.0,Quinta Normal,-33.445,-70.683,13,330020
2023,2,30,17.0,Valparaíso,-33.03,-71.63,5,320041
";
        let rows = ObservationReader::new().parse_rows(text).unwrap();

        let dataset = CsvObservationSource::build_dataset(&rows, &PipelineConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(dataset.stations.len(), 1);
        assert_eq!(dataset.observations.len(), 1);
        assert_eq!(dataset.observations[0].station_code, "330020");
    }

    #[test]
    fn test_fetch_from_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(CSV.as_bytes())?;

        let source = CsvObservationSource::new(temp_file.path());
        let dataset = source.fetch(&PipelineConfig::default())?.unwrap();

        assert_eq!(dataset.observations.len(), 3);
        Ok(())
    }

    #[test]
    fn test_in_memory_source_applies_the_same_filters() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let raw = RawDataset::new(
            vec![
                Station::new("A".into(), "A".into(), Some(-33.4), Some(-70.6), 13),
                Station::new("V".into(), "V".into(), Some(-33.0), Some(-71.6), 5),
            ],
            vec![
                Observation::new("A".into(), day(2020, 5, 1), Some(10.0)),
                Observation::new("A".into(), day(2020, 5, 1), Some(11.0)),
                Observation::new("A".into(), day(2030, 5, 1), Some(12.0)),
                Observation::new("V".into(), day(2020, 5, 1), Some(13.0)),
            ],
        );

        let dataset = raw.fetch(&PipelineConfig::default()).unwrap().unwrap();

        assert_eq!(dataset.stations.len(), 1);
        assert_eq!(dataset.observations.len(), 1);
        assert_eq!(dataset.observations[0].temperature, Some(10.0));
    }
}
