use crate::error::Result;
use crate::models::Station;
use crate::utils::read_text_file;
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

/// Reads the station directory CSV
/// (`Nombre_Estacion, Latitud, Longitud, Codigo_Estacion, Region`).
pub struct StationReader {
    region: Option<u32>,
}

impl StationReader {
    pub fn new() -> Self {
        Self { region: None }
    }

    /// Only keep stations of this region
    pub fn with_region(region: u32) -> Self {
        Self {
            region: Some(region),
        }
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let text = read_text_file(path)?;
        self.parse_stations(&text)
    }

    pub fn parse_stations(&self, text: &str) -> Result<Vec<Station>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut stations = Vec::new();
        for row in reader.deserialize::<Station>() {
            let station = row?;

            if let Some(region) = self.region {
                if !station.is_in_region(region) {
                    continue;
                }
            }

            if let Err(e) = station.validate() {
                warn!("Skipping station {} ({}): {}", station.code, station.name, e);
                continue;
            }

            stations.push(station);
        }

        debug!("Read {} stations", stations.len());
        Ok(stations)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const STATIONS: &str = "\
Nombre_Estacion,Latitud,Longitud,Codigo_Estacion,Region
Quinta Normal,-33.445,-70.683,330020,13
Pudahuel, -33.393 , -70.794 ,330021,13
Sin Coordenadas,,,330099,13
Valparaíso,-33.03,-71.63,320041,5
";

    #[test]
    fn test_parse_stations() {
        let stations = StationReader::new().parse_stations(STATIONS).unwrap();

        assert_eq!(stations.len(), 4);
        assert_eq!(stations[0].code, "330020");
        assert_eq!(stations[1].latitude, Some(-33.393));
        assert_eq!(stations[2].coordinates(), None);
        assert_eq!(stations[3].name, "Valparaíso");
    }

    #[test]
    fn test_region_filter() {
        let stations = StationReader::with_region(13).parse_stations(STATIONS).unwrap();
        assert_eq!(stations.len(), 3);
        assert!(stations.iter().all(|s| s.region == 13));
    }

    #[test]
    fn test_out_of_range_station_skipped() {
        let text = "Nombre_Estacion,Latitud,Longitud,Codigo_Estacion,Region\nMala,-133.0,-70.0,1,13\n";
        let stations = StationReader::new().parse_stations(text).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn test_read_windows_1252_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"Nombre_Estacion,Latitud,Longitud,Codigo_Estacion,Region\n")?;
        temp_file.write_all(b"Pe\xF1alol\xE9n,-33.48,-70.54,330030,13\n")?;

        let stations = StationReader::new().read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].code, "330030");
        assert_eq!(stations[0].name, "Peñalolén");
        Ok(())
    }
}
