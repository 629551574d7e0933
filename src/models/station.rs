use serde::{Deserialize, Serialize};
use validator::Validate;

/// A weather station as published by the station directory.
///
/// Coordinates are optional because the upstream directory occasionally
/// omits them; such stations can never be assigned to a comuna.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[serde(rename = "Codigo_Estacion")]
    #[validate(length(min = 1))]
    pub code: String,

    #[serde(rename = "Nombre_Estacion")]
    pub name: String,

    #[serde(rename = "Latitud")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(rename = "Longitud")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[serde(rename = "Region")]
    pub region: u32,
}

impl Station {
    pub fn new(
        code: String,
        name: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        region: u32,
    ) -> Self {
        Self {
            code,
            name,
            latitude,
            longitude,
            region,
        }
    }

    /// (latitude, longitude) when both are present and finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_in_region(&self, region: u32) -> bool {
        self.region == region
    }
}
