pub mod comuna_reader;
pub mod concurrent_reader;
pub mod observation_reader;
pub mod observation_source;
pub mod station_reader;

pub use comuna_reader::ComunaReader;
pub use concurrent_reader::{AssignmentInputs, ConcurrentReader, PipelineInputs};
pub use observation_reader::{ObservationReader, ObservationRow};
pub use observation_source::{CsvObservationSource, ObservationSource};
pub use station_reader::StationReader;
