pub mod grouping;
pub mod knn;
pub mod linear;
pub mod seasonal;

pub use knn::KnnImputer;
pub use linear::LinearInterpolation;
pub use seasonal::{SeasonalPattern, SeasonalProfile};

use crate::config::PipelineConfig;
use crate::models::{ComunaSeries, SeriesRecord};
use crate::utils::constants::{DEFAULT_KNN_NEIGHBORS, METHOD_KNN, METHOD_LINEAR, METHOD_SEASONAL};
use std::fmt;
use tracing::{debug, info, warn};

/// A gap-filling strategy.
///
/// Implementations read the whole series and return `(row index, value)`
/// pairs for rows whose temperature is missing. They never propose values
/// for rows that already hold one.
pub trait GapFiller: Send + Sync {
    fn name(&self) -> &'static str;

    fn fill(&self, records: &[SeriesRecord]) -> Vec<(usize, f32)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconstructionMethod {
    Linear,
    Seasonal,
    #[default]
    Knn,
}

impl ReconstructionMethod {
    /// Resolve a caller-supplied discriminator. Anything unrecognized
    /// resolves to KNN, which is logged but not an error.
    pub fn from_discriminator(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            METHOD_LINEAR | "lineal" => ReconstructionMethod::Linear,
            METHOD_SEASONAL | "estacional" => ReconstructionMethod::Seasonal,
            METHOD_KNN => ReconstructionMethod::Knn,
            other => {
                warn!(
                    "Unrecognized reconstruction method '{}', falling back to {}",
                    other, METHOD_KNN
                );
                ReconstructionMethod::Knn
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReconstructionMethod::Linear => METHOD_LINEAR,
            ReconstructionMethod::Seasonal => METHOD_SEASONAL,
            ReconstructionMethod::Knn => METHOD_KNN,
        }
    }
}

impl fmt::Display for ReconstructionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fills the gaps of a materialized series with the selected strategy
pub struct Reconstructor {
    method: ReconstructionMethod,
    knn_neighbors: usize,
}

impl Reconstructor {
    pub fn new(method: ReconstructionMethod) -> Self {
        Self {
            method,
            knn_neighbors: DEFAULT_KNN_NEIGHBORS,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.reconstruction_method()).with_knn_neighbors(config.knn_neighbors)
    }

    pub fn with_knn_neighbors(mut self, neighbors: usize) -> Self {
        self.knn_neighbors = neighbors;
        self
    }

    pub fn method(&self) -> ReconstructionMethod {
        self.method
    }

    fn filler(&self) -> Box<dyn GapFiller> {
        match self.method {
            ReconstructionMethod::Linear => Box::new(LinearInterpolation::new()),
            ReconstructionMethod::Seasonal => Box::new(SeasonalPattern::new()),
            ReconstructionMethod::Knn => Box::new(KnnImputer::new(self.knn_neighbors)),
        }
    }

    /// Same rows in, same rows out; only missing temperatures change
    pub fn reconstruct(&self, mut series: ComunaSeries) -> ComunaSeries {
        let missing_before = series.missing_count();
        if missing_before == 0 {
            debug!("Series has no missing values, nothing to reconstruct");
            return series;
        }

        info!(
            "Reconstructing {} missing values ({:.1}% of {} rows) with {}",
            missing_before,
            series.missing_percentage(),
            series.len(),
            self.method
        );

        let filler = self.filler();
        let fills = filler.fill(series.records());
        let applied = series.apply_fills(fills);

        let missing_after = series.missing_count();
        info!(
            "{} filled {} values, {} still missing ({:.1}% reduction)",
            filler.name(),
            applied,
            missing_after,
            100.0 * (missing_before - missing_after) as f64 / missing_before as f64
        );

        if missing_after > 0 {
            warn!(
                "{} values could not be reconstructed with {}",
                missing_after, self.method
            );
        }

        series
    }
}
