use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Comuna, RawDataset, Station};
use crate::readers::{ComunaReader, CsvObservationSource, ObservationSource, StationReader};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::debug;

/// Inputs of a reconstruction run
#[derive(Debug)]
pub struct PipelineInputs {
    /// `None` when no observation falls in the configured region and years
    pub dataset: Option<RawDataset>,
    pub comunas: Vec<Comuna>,
}

/// Inputs of an assignment-only run
#[derive(Debug)]
pub struct AssignmentInputs {
    pub stations: Vec<Station>,
    pub comunas: Vec<Comuna>,
}

/// Reads the input files on the blocking pool, concurrently
pub struct ConcurrentReader {
    region: u32,
}

impl ConcurrentReader {
    pub fn new(region: u32) -> Self {
        Self { region }
    }

    pub async fn read_inputs(
        &self,
        observations_path: &Path,
        comunas_path: &Path,
        config: &PipelineConfig,
    ) -> Result<PipelineInputs> {
        let observations_path = observations_path.to_path_buf();
        let config = config.clone();
        let observations_handle: JoinHandle<Result<Option<RawDataset>>> =
            tokio::task::spawn_blocking(move || {
                CsvObservationSource::new(observations_path).fetch(&config)
            });

        let comunas_handle = self.spawn_comuna_reader(comunas_path);

        let (dataset, comunas) = tokio::try_join!(observations_handle, comunas_handle)?;
        let inputs = PipelineInputs {
            dataset: dataset?,
            comunas: comunas?,
        };

        debug!(
            "Loaded {} comunas and {} observations",
            inputs.comunas.len(),
            inputs.dataset.as_ref().map_or(0, |d| d.observations.len())
        );

        Ok(inputs)
    }

    pub async fn read_assignment_inputs(
        &self,
        stations_path: &Path,
        comunas_path: &Path,
    ) -> Result<AssignmentInputs> {
        let stations_path = stations_path.to_path_buf();
        let region = self.region;
        let stations_handle: JoinHandle<Result<Vec<Station>>> =
            tokio::task::spawn_blocking(move || {
                StationReader::with_region(region).read_stations(&stations_path)
            });

        let comunas_handle = self.spawn_comuna_reader(comunas_path);

        let (stations, comunas) = tokio::try_join!(stations_handle, comunas_handle)?;
        Ok(AssignmentInputs {
            stations: stations?,
            comunas: comunas?,
        })
    }

    fn spawn_comuna_reader(&self, path: &Path) -> JoinHandle<Result<Vec<Comuna>>> {
        let path: PathBuf = path.to_path_buf();
        let region = self.region;
        tokio::task::spawn_blocking(move || ComunaReader::with_region(region).read_comunas(&path))
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(crate::utils::constants::DEFAULT_REGION_CODE)
    }
}
