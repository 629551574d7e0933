use chrono::{Datelike, Local};
use std::path::PathBuf;

fn date_stamp() -> String {
    let now = Local::now();
    format!("{:02}{:02}{:02}", now.year() % 100, now.month(), now.day())
}

/// Default series output: output/temperaturas-comunas-{YYMMDD}.csv
pub fn generate_default_series_filename() -> PathBuf {
    PathBuf::from("output").join(format!("temperaturas-comunas-{}.csv", date_stamp()))
}

/// Default assignment output: output/asignaciones-{YYMMDD}.csv
pub fn generate_default_assignments_filename() -> PathBuf {
    PathBuf::from("output").join(format!("asignaciones-{}.csv", date_stamp()))
}
