use crate::error::Result;
use crate::models::{SeriesRecord, StationAssignment};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// CSV output for the series and assignment tables.
///
/// Missing temperatures are written as empty cells.
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn write_series(&self, records: &[SeriesRecord], path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        self.write_series_to(records, file)?;
        debug!("Wrote {} series rows to {}", records.len(), path.display());
        Ok(())
    }

    pub fn write_series_to<W: Write>(&self, records: &[SeriesRecord], writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        if records.is_empty() {
            writer.write_record(SERIES_HEADERS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_assignments(&self, assignments: &[StationAssignment], path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        self.write_assignments_to(assignments, file)?;
        debug!("Wrote {} assignments to {}", assignments.len(), path.display());
        Ok(())
    }

    pub fn write_assignments_to<W: Write>(
        &self,
        assignments: &[StationAssignment],
        writer: W,
    ) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        if assignments.is_empty() {
            writer.write_record(ASSIGNMENT_HEADERS)?;
        }
        for assignment in assignments {
            writer.serialize(assignment.to_row())?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

const SERIES_HEADERS: [&str; 12] = [
    "Año",
    "Mes",
    "Dias",
    "Temperatura_Media",
    "Nombre_Estacion",
    "Latitud",
    "Longitud",
    "Region",
    "Codigo_Estacion",
    "Fecha",
    "Comuna",
    "Distancia_Estacion_km",
];

const ASSIGNMENT_HEADERS: [&str; 3] = ["Comuna", "Estacion_Cercana", "Distancia_km"];
