pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use crate::error::Result;
use crate::models::SeriesRecord;
use std::path::Path;

/// Write the series table, as Parquet for a `.parquet` path and CSV otherwise
pub fn write_series(records: &[SeriesRecord], path: &Path, compression: &str) -> Result<()> {
    if is_parquet_path(path) {
        ParquetWriter::new()
            .with_compression(compression)?
            .write_series(records, path)
    } else {
        CsvWriter::new().write_series(records, path)
    }
}

pub fn is_parquet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_extension() {
        assert!(is_parquet_path(Path::new("out/series.parquet")));
        assert!(is_parquet_path(Path::new("out/series.PARQUET")));
        assert!(!is_parquet_path(Path::new("out/series.csv")));
        assert!(!is_parquet_path(Path::new("out/series")));
    }
}
