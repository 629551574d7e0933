pub mod centroid;
pub mod distance;
pub mod projection;

pub use centroid::CentroidCalculator;
pub use distance::{DistanceMatrix, DistanceMetric};
pub use projection::{CoordinateSystem, UtmProjection};
