use crate::models::Station;
use serde::{Deserialize, Serialize};

/// Nearest-station choice for one comuna
#[derive(Debug, Clone, PartialEq)]
pub struct StationAssignment {
    pub comuna: String,
    pub station_code: String,
    pub station_name: String,
    pub station_latitude: f64,
    pub station_longitude: f64,
    pub station_region: u32,
    pub distance_km: f64,
}

impl StationAssignment {
    /// Build an assignment from a station whose coordinates are known
    pub fn from_station(comuna: String, station: &Station, distance_km: f64) -> Option<Self> {
        let (latitude, longitude) = station.coordinates()?;
        Some(Self {
            comuna,
            station_code: station.code.clone(),
            station_name: station.name.clone(),
            station_latitude: latitude,
            station_longitude: longitude,
            station_region: station.region,
            distance_km,
        })
    }

    pub fn to_row(&self) -> AssignmentRow {
        AssignmentRow {
            comuna: self.comuna.clone(),
            nearest_station: self.station_name.clone(),
            distance_km: self.distance_km,
        }
    }
}

/// Auxiliary assignment table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "Comuna")]
    pub comuna: String,

    #[serde(rename = "Estacion_Cercana")]
    pub nearest_station: String,

    #[serde(rename = "Distancia_km")]
    pub distance_km: f64,
}
