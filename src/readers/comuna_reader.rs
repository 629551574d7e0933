use crate::error::Result;
use crate::models::Comuna;
use crate::utils::read_text_file;
use std::path::Path;
use tracing::debug;

/// Reads comuna geometries from a JSON array of
/// `{comuna, codregion, cod_comuna, crs, geometry}` objects.
pub struct ComunaReader {
    region: Option<u32>,
}

impl ComunaReader {
    pub fn new() -> Self {
        Self { region: None }
    }

    pub fn with_region(region: u32) -> Self {
        Self {
            region: Some(region),
        }
    }

    pub fn read_comunas(&self, path: &Path) -> Result<Vec<Comuna>> {
        let text = read_text_file(path)?;
        let comunas = self.parse_comunas(&text)?;
        debug!("Read {} comunas from {}", comunas.len(), path.display());
        Ok(comunas)
    }

    pub fn parse_comunas(&self, text: &str) -> Result<Vec<Comuna>> {
        let comunas: Vec<Comuna> = serde_json::from_str(text)?;

        Ok(match self.region {
            Some(region) => comunas
                .into_iter()
                .filter(|c| c.region_code == region)
                .collect(),
            None => comunas,
        })
    }
}

impl Default for ComunaReader {
    fn default() -> Self {
        Self::new()
    }
}
