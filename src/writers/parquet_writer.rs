use crate::error::{ProcessingError, Result};
use crate::models::SeriesRecord;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_BATCH_SIZE, DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Writes the comuna series table to Parquet
pub struct ParquetWriter {
    compression: Compression,
    batch_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Write series rows in batches; an empty slice still produces a valid file
    pub fn write_series(&self, records: &[SeriesRecord], path: &Path) -> Result<()> {
        let schema = Self::create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(DEFAULT_ROW_GROUP_SIZE)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in records.chunks(self.batch_size) {
            let batch = Self::records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }

    /// Arrow schema of the series table, columns in output order
    pub fn create_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("Año", DataType::Int32, false),
            Field::new("Mes", DataType::UInt32, false),
            Field::new("Dias", DataType::UInt32, false),
            Field::new("Temperatura_Media", DataType::Float32, true),
            Field::new("Nombre_Estacion", DataType::Utf8, false),
            Field::new("Latitud", DataType::Float64, false),
            Field::new("Longitud", DataType::Float64, false),
            Field::new("Region", DataType::UInt32, false),
            Field::new("Codigo_Estacion", DataType::Utf8, false),
            Field::new("Fecha", DataType::Date32, false),
            Field::new("Comuna", DataType::Utf8, false),
            Field::new("Distancia_Estacion_km", DataType::Float64, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(records: &[SeriesRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let years = Int32Array::from_iter_values(records.iter().map(|r| r.year));
        let months = UInt32Array::from_iter_values(records.iter().map(|r| r.month));
        let days = UInt32Array::from_iter_values(records.iter().map(|r| r.day));
        let temperatures: Float32Array = records.iter().map(|r| r.temperature).collect();
        let station_names = StringArray::from_iter_values(records.iter().map(|r| r.station_name.as_str()));
        let latitudes = Float64Array::from_iter_values(records.iter().map(|r| r.latitude));
        let longitudes = Float64Array::from_iter_values(records.iter().map(|r| r.longitude));
        let regions = UInt32Array::from_iter_values(records.iter().map(|r| r.region));
        let station_codes = StringArray::from_iter_values(records.iter().map(|r| r.station_code.as_str()));
        let dates = Date32Array::from_iter_values(records.iter().map(|r| days_since_epoch(r.date)));
        let comunas = StringArray::from_iter_values(records.iter().map(|r| r.comuna.as_str()));
        let distances = Float64Array::from_iter_values(records.iter().map(|r| r.distance_km));

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(years),
                Arc::new(months),
                Arc::new(days),
                Arc::new(temperatures),
                Arc::new(station_names),
                Arc::new(latitudes),
                Arc::new(longitudes),
                Arc::new(regions),
                Arc::new(station_codes),
                Arc::new(dates),
                Arc::new(comunas),
                Arc::new(distances),
            ],
        )?;

        Ok(batch)
    }

    /// Read back up to `limit` rows of a series file
    pub fn read_sample_records(&self, path: &Path, limit: usize) -> Result<Vec<SeriesRecord>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, DEFAULT_BATCH_SIZE))
            .build()?;

        let mut records = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let years = column::<Int32Array>(&batch, 0, "Año")?;
            let months = column::<UInt32Array>(&batch, 1, "Mes")?;
            let days = column::<UInt32Array>(&batch, 2, "Dias")?;
            let temperatures = column::<Float32Array>(&batch, 3, "Temperatura_Media")?;
            let station_names = column::<StringArray>(&batch, 4, "Nombre_Estacion")?;
            let latitudes = column::<Float64Array>(&batch, 5, "Latitud")?;
            let longitudes = column::<Float64Array>(&batch, 6, "Longitud")?;
            let regions = column::<UInt32Array>(&batch, 7, "Region")?;
            let station_codes = column::<StringArray>(&batch, 8, "Codigo_Estacion")?;
            let dates = column::<Date32Array>(&batch, 9, "Fecha")?;
            let comunas = column::<StringArray>(&batch, 10, "Comuna")?;
            let distances = column::<Float64Array>(&batch, 11, "Distancia_Estacion_km")?;

            for i in 0..batch.num_rows() {
                if records.len() >= limit {
                    return Ok(records);
                }

                let date = date_from_days(dates.value(i)).ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid date in Parquet file".to_string())
                })?;

                records.push(SeriesRecord {
                    year: years.value(i),
                    month: months.value(i),
                    day: days.value(i),
                    temperature: temperatures.is_valid(i).then(|| temperatures.value(i)),
                    station_name: station_names.value(i).to_string(),
                    latitude: latitudes.value(i),
                    longitude: longitudes.value(i),
                    region: regions.value(i),
                    station_code: station_codes.value(i).to_string(),
                    date,
                    comuna: comunas.value(i).to_string(),
                    distance_km: distances.value(i),
                });
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid {} column type", name)))
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(epoch()).num_days() as i32
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    epoch().checked_add_signed(chrono::Duration::days(days as i64))
}

#[derive(Debug, Clone)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            avg_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::fixtures::daily;
    use tempfile::NamedTempFile;

    fn sample() -> Vec<SeriesRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 7, 15).unwrap();
        daily("Providencia", start, &[Some(9.5), None, Some(11.0)])
    }

    #[test]
    fn test_write_empty_series() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        ParquetWriter::new().write_series(&[], temp_file.path())?;

        let info = ParquetWriter::new().get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 0);
        Ok(())
    }

    #[test]
    fn test_nulls_and_dates_survive() -> Result<()> {
        let writer = ParquetWriter::new().with_batch_size(2);
        let temp_file = NamedTempFile::new()?;
        let records = sample();

        writer.write_series(&records, temp_file.path())?;
        let read_back = writer.read_sample_records(temp_file.path(), 10)?;

        assert_eq!(read_back, records);
        assert_eq!(read_back[1].temperature, None);

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 3);
        assert!(info.summary().contains("Total rows: 3"));
        Ok(())
    }

    #[test]
    fn test_date32_is_days_since_unix_epoch() {
        assert_eq!(days_since_epoch(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
        assert_eq!(
            date_from_days(19_723),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_series(&sample(), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli9").is_err());
        Ok(())
    }
}
