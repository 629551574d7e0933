use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Comuna, ComunaSeries, StationAssignment};
use crate::processors::{
    GapAnalyzer, GapReport, ReconstructionComparison, SeriesMaterializer, StationAssigner,
};
use crate::readers::ObservationSource;
use crate::reconstruction::Reconstructor;
use crate::utils::progress::ProgressReporter;
use tracing::{info, warn};

/// Assignments and the materialized series, before any gap is filled
#[derive(Debug, Clone)]
pub struct MaterializedData {
    pub assignments: Vec<StationAssignment>,
    pub series: ComunaSeries,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub assignments: Vec<StationAssignment>,
    pub series: ComunaSeries,
    /// Gaps of the series as materialized
    pub report: GapReport,
    pub comparison: ReconstructionComparison,
}

/// Runs acquisition, assignment, materialization and reconstruction.
///
/// A stage that yields nothing ends the run with `Ok(None)`. Malformed input
/// (bad geometry, no usable station) is an `Err`.
pub struct Pipeline {
    config: PipelineConfig,
    max_workers: usize,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            max_workers: num_cpus::get(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Acquire, assign and materialize without reconstructing
    pub fn prepare(
        &self,
        source: &dyn ObservationSource,
        comunas: &[Comuna],
        progress: Option<&ProgressReporter>,
    ) -> Result<Option<MaterializedData>> {
        if let Some(p) = progress {
            p.set_message("Reading observations...");
        }

        let dataset = match source.fetch(&self.config)? {
            Some(dataset) if !dataset.is_empty() => dataset,
            _ => {
                warn!(
                    "No observations for region {} in {}..{}",
                    self.config.region_code, self.config.start_year, self.config.end_year
                );
                return Ok(None);
            }
        };
        info!(
            "Loaded {} observations from {} stations ({} missing)",
            dataset.observations.len(),
            dataset.stations.len(),
            dataset.missing_count()
        );

        let regional: Vec<Comuna> = comunas
            .iter()
            .filter(|c| c.region_code == self.config.region_code)
            .cloned()
            .collect();
        if regional.len() < comunas.len() {
            info!(
                "Skipping {} comunas outside region {}",
                comunas.len() - regional.len(),
                self.config.region_code
            );
        }
        if regional.is_empty() {
            warn!("No comunas in region {}", self.config.region_code);
            return Ok(None);
        }

        if let Some(p) = progress {
            p.set_message(&format!("Assigning {} comunas to stations...", regional.len()));
        }

        let assigner = StationAssigner::from_config(&self.config)?;
        let assignments = assigner.assign(&regional, &dataset.stations)?;
        if assignments.is_empty() {
            warn!("No comuna could be assigned to a station");
            return Ok(None);
        }

        if let Some(p) = progress {
            p.set_message("Materializing comuna series...");
        }

        let series = SeriesMaterializer::new().materialize(&assignments, &dataset);
        if series.is_empty() {
            warn!("Materialization produced no rows");
            return Ok(None);
        }

        Ok(Some(MaterializedData {
            assignments,
            series,
        }))
    }

    /// Run every stage; `Ok(None)` when any stage produced no data
    pub fn run(
        &self,
        source: &dyn ObservationSource,
        comunas: &[Comuna],
        progress: Option<&ProgressReporter>,
    ) -> Result<Option<PipelineOutput>> {
        let Some(MaterializedData {
            assignments,
            series,
        }) = self.prepare(source, comunas, progress)?
        else {
            if let Some(p) = progress {
                p.finish_with_message("No data to reconstruct");
            }
            return Ok(None);
        };

        let analyzer = GapAnalyzer::new();
        let report = analyzer.analyze(&series);

        let reconstructor = Reconstructor::from_config(&self.config);
        if let Some(p) = progress {
            p.set_message(&format!(
                "Reconstructing {} missing values with {}...",
                report.missing_records,
                reconstructor.method()
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let before = series.clone();
        let reconstructed = pool.install(|| reconstructor.reconstruct(series));
        let comparison = analyzer.compare(&before, &reconstructed);

        info!("{}", analyzer.summarize_comparison(&comparison));

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Reconstructed {} rows for {} comunas",
                reconstructed.len(),
                report.comuna_statistics.len()
            ));
        }

        Ok(Some(PipelineOutput {
            assignments,
            series: reconstructed,
            report,
            comparison,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, RawDataset, Station};
    use chrono::NaiveDate;

    fn square(lon: f64, lat: f64) -> Vec<Vec<Vec<[f64; 2]>>> {
        vec![vec![vec![
            [lon - 0.05, lat - 0.05],
            [lon + 0.05, lat - 0.05],
            [lon + 0.05, lat + 0.05],
            [lon - 0.05, lat + 0.05],
            [lon - 0.05, lat - 0.05],
        ]]]
    }

    fn comunas() -> Vec<Comuna> {
        vec![
            Comuna::new("Santiago".into(), 13, "EPSG:4326", Some(square(-70.65, -33.45))),
            Comuna::new("Puente Alto".into(), 13, "EPSG:4326", Some(square(-70.58, -33.61))),
            Comuna::new("Valparaíso".into(), 5, "EPSG:4326", Some(square(-71.62, -33.05))),
        ]
    }

    fn dataset() -> RawDataset {
        let day = |d| NaiveDate::from_ymd_opt(2023, 6, d).unwrap();
        RawDataset::new(
            vec![
                Station::new("N".into(), "Quinta Normal".into(), Some(-33.445), Some(-70.683), 13),
                Station::new("S".into(), "Pirque".into(), Some(-33.63), Some(-70.57), 13),
            ],
            vec![
                Observation::new("N".into(), day(1), Some(8.0)),
                Observation::new("N".into(), day(2), None),
                Observation::new("N".into(), day(3), Some(10.0)),
                Observation::new("S".into(), day(1), Some(6.0)),
                Observation::new("S".into(), day(2), Some(7.0)),
                Observation::new("S".into(), day(3), None),
            ],
        )
    }

    fn config(method: &str) -> PipelineConfig {
        PipelineConfig::default()
            .with_years(Some(2023), Some(2024))
            .with_method(Some(method.to_string()))
    }

    #[test]
    fn test_linear_run_fills_everything() {
        let pipeline = Pipeline::new(config("linear")).with_max_workers(2);

        let output = pipeline.run(&dataset(), &comunas(), None).unwrap().unwrap();

        assert_eq!(output.assignments.len(), 2);
        assert_eq!(output.assignments[0].station_code, "N");
        assert_eq!(output.assignments[1].station_code, "S");
        assert_eq!(output.series.len(), 6);
        assert_eq!(output.series.missing_count(), 0);
        assert_eq!(output.report.missing_records, 2);
        assert_eq!(output.comparison.filled(), 2);
        assert_eq!(output.series.records()[1].temperature, Some(9.0));
    }

    #[test]
    fn test_prepare_does_not_reconstruct() {
        let pipeline = Pipeline::new(config("knn"));

        let prepared = pipeline.prepare(&dataset(), &comunas(), None).unwrap().unwrap();

        assert_eq!(prepared.series.missing_count(), 2);
        assert_eq!(prepared.series.comunas(), vec!["Santiago", "Puente Alto"]);
    }

    #[test]
    fn test_years_outside_range_yield_no_output() {
        let pipeline = Pipeline::new(config("knn").with_years(Some(2019), Some(2021)));

        assert!(pipeline.run(&dataset(), &comunas(), None).unwrap().is_none());
    }

    #[test]
    fn test_no_comunas_in_region_yields_no_output() {
        let pipeline = Pipeline::new(PipelineConfig {
            region_code: 7,
            ..config("knn")
        });

        assert!(pipeline.run(&dataset(), &comunas(), None).unwrap().is_none());
    }

    #[test]
    fn test_missing_geometry_is_fatal() {
        let pipeline = Pipeline::new(config("knn"));
        let comunas = vec![Comuna::new("Lo Barnechea".into(), 13, "EPSG:4326", None)];

        let result = pipeline.run(&dataset(), &comunas, None);
        assert!(matches!(result, Err(ProcessingError::Geometry(_))));
    }
}
