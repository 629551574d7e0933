pub mod assignment;
pub mod comuna;
pub mod observation;
pub mod series;
pub mod station;

pub use assignment::{AssignmentRow, StationAssignment};
pub use comuna::{Comuna, ComunaCentroid, MultiPolygonCoords};
pub use observation::{Observation, RawDataset};
pub use series::{ComunaSeries, SeriesRecord};
pub use station::Station;
