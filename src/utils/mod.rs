pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;
pub mod text;

pub use constants::*;
pub use coordinates::{euclidean_degree_distance, haversine_distance, validate_coordinates};
pub use filename::{generate_default_assignments_filename, generate_default_series_filename};
pub use progress::ProgressReporter;
pub use text::read_text_file;
