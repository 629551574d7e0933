pub mod gap_analyzer;
pub mod pipeline;
pub mod series_materializer;
pub mod station_assigner;

pub use gap_analyzer::{ComunaGapStatistics, Gap, GapAnalyzer, GapReport, ReconstructionComparison};
pub use pipeline::{MaterializedData, Pipeline, PipelineOutput};
pub use series_materializer::SeriesMaterializer;
pub use station_assigner::StationAssigner;
