use crate::error::{ProcessingError, Result};
use crate::geometry::DistanceMetric;
use crate::reconstruction::ReconstructionMethod;
use crate::utils::constants::*;
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use validator::Validate;

/// Knobs for one pipeline run.
///
/// Values are layered: built-in defaults, then an optional TOML file, then
/// `COMUNA_TEMPS_*` environment variables. The CLI applies its own flags on
/// top of whatever [`PipelineConfig::load`] returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[validate(range(min = 1850, max = 2200))]
    pub start_year: i32,

    /// Exclusive upper bound of the year range
    #[validate(range(min = 1851, max = 2201))]
    pub end_year: i32,

    /// Reconstruction method discriminator (`linear`, `seasonal`, `knn`)
    pub method: String,

    pub region_code: u32,

    pub distance_metric: DistanceMetric,

    pub km_per_degree: f64,

    #[validate(range(min = 1))]
    pub knn_neighbors: usize,

    #[validate(range(min = 1, max = 60))]
    pub utm_zone: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            method: METHOD_KNN.to_string(),
            region_code: DEFAULT_REGION_CODE,
            distance_metric: DistanceMetric::EuclideanDegrees,
            km_per_degree: KM_PER_DEGREE,
            knn_neighbors: DEFAULT_KNN_NEIGHBORS,
            utm_zone: DEFAULT_UTM_ZONE,
        }
    }
}

impl PipelineConfig {
    /// Load defaults, an optional config file and environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(path, None)
    }

    /// `env` replaces the process environment when given
    fn load_layers(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("start_year", defaults.start_year as i64)?
            .set_default("end_year", defaults.end_year as i64)?
            .set_default("method", defaults.method.clone())?
            .set_default("region_code", defaults.region_code as i64)?
            .set_default("distance_metric", "euclidean_degrees")?
            .set_default("km_per_degree", defaults.km_per_degree)?
            .set_default("knn_neighbors", defaults.knn_neighbors as i64)?
            .set_default("utm_zone", defaults.utm_zone as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate_all()?;
        Ok(config)
    }

    /// Field-level validation plus the cross-field rules
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;

        if self.start_year >= self.end_year {
            return Err(ProcessingError::Config(format!(
                "start_year ({}) must be before end_year ({})",
                self.start_year, self.end_year
            )));
        }

        if !(self.km_per_degree.is_finite() && self.km_per_degree > 0.0) {
            return Err(ProcessingError::Config(format!(
                "km_per_degree must be positive, got {}",
                self.km_per_degree
            )));
        }

        Ok(())
    }

    pub fn with_years(mut self, start_year: Option<i32>, end_year: Option<i32>) -> Self {
        if let Some(start) = start_year {
            self.start_year = start;
        }
        if let Some(end) = end_year {
            self.end_year = end;
        }
        self
    }

    pub fn with_method(mut self, method: Option<String>) -> Self {
        if let Some(method) = method {
            self.method = method;
        }
        self
    }

    pub fn years(&self) -> Range<i32> {
        self.start_year..self.end_year
    }

    /// Resolved method; unknown discriminators resolve to KNN
    pub fn reconstruction_method(&self) -> ReconstructionMethod {
        ReconstructionMethod::from_discriminator(&self.method)
    }
}
