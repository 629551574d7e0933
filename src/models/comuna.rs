use serde::{Deserialize, Serialize};

/// Polygon coordinates as (x, y) pairs: polygons → rings → vertices.
/// The first ring of each polygon is the exterior, the rest are holes.
pub type MultiPolygonCoords = Vec<Vec<Vec<[f64; 2]>>>;

fn default_crs() -> String {
    "EPSG:4326".to_string()
}

/// Administrative subdivision as delivered by the boundary loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comuna {
    #[serde(rename = "comuna")]
    pub name: String,

    #[serde(rename = "codregion")]
    pub region_code: u32,

    #[serde(rename = "cod_comuna", default)]
    pub code: Option<u32>,

    #[serde(default = "default_crs")]
    pub crs: String,

    pub geometry: Option<MultiPolygonCoords>,
}

impl Comuna {
    pub fn new(name: String, region_code: u32, crs: &str, geometry: Option<MultiPolygonCoords>) -> Self {
        Self {
            name,
            region_code,
            code: None,
            crs: crs.to_string(),
            geometry,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry
            .as_ref()
            .map(|polygons| polygons.iter().flatten().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

/// Geographic centroid of a comuna (WGS84 degrees)
#[derive(Debug, Clone, PartialEq)]
pub struct ComunaCentroid {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ComunaCentroid {
    pub fn new(name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
