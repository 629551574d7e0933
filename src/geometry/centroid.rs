use crate::error::{ProcessingError, Result};
use crate::geometry::projection::{CoordinateSystem, UtmProjection};
use crate::models::{Comuna, ComunaCentroid};
use crate::utils::validate_coordinates;
use geo::{Centroid, LineString, MultiPolygon, Polygon};
use tracing::debug;

/// Computes comuna centroids in a metric UTM frame and expresses them back
/// in geographic degrees, so they can be compared with station coordinates.
pub struct CentroidCalculator {
    projection: UtmProjection,
}

impl CentroidCalculator {
    pub fn new(projection: UtmProjection) -> Self {
        Self { projection }
    }

    /// Calculator for a southern-hemisphere UTM zone (EPSG:327zz)
    pub fn for_zone(zone: u8) -> Result<Self> {
        Ok(Self::new(UtmProjection::south(zone)?))
    }

    pub fn compute_all(&self, comunas: &[Comuna]) -> Result<Vec<ComunaCentroid>> {
        comunas.iter().map(|c| self.compute(c)).collect()
    }

    pub fn compute(&self, comuna: &Comuna) -> Result<ComunaCentroid> {
        let geometry = comuna.geometry.as_ref().ok_or_else(|| {
            ProcessingError::Geometry(format!("Comuna '{}' has no geometry", comuna.name))
        })?;

        let crs: CoordinateSystem = comuna.crs.parse()?;
        let target = self.projection.coordinate_system();
        if crs != CoordinateSystem::Geographic && crs != target {
            return Err(ProcessingError::Geometry(format!(
                "Comuna '{}' is in {}, incompatible with {}",
                comuna.name, crs, target
            )));
        }

        let mut polygons = Vec::with_capacity(geometry.len());
        for rings in geometry {
            let mut projected_rings = Vec::with_capacity(rings.len());
            for ring in rings {
                let mut points = Vec::with_capacity(ring.len());
                for &[x, y] in ring {
                    points.push(self.to_projected(comuna, crs, x, y)?);
                }
                projected_rings.push(LineString::from(points));
            }

            let mut projected_rings = projected_rings.into_iter();
            if let Some(exterior) = projected_rings.next() {
                polygons.push(Polygon::new(exterior, projected_rings.collect()));
            }
        }

        let centroid = MultiPolygon::new(polygons).centroid().ok_or_else(|| {
            ProcessingError::Geometry(format!("Comuna '{}' has an empty geometry", comuna.name))
        })?;

        let (latitude, longitude) = self.projection.inverse(centroid.x(), centroid.y());
        debug!(
            "Centroid of {}: ({:.5}, {:.5})",
            comuna.name, latitude, longitude
        );

        Ok(ComunaCentroid::new(comuna.name.clone(), latitude, longitude))
    }

    fn to_projected(
        &self,
        comuna: &Comuna,
        crs: CoordinateSystem,
        x: f64,
        y: f64,
    ) -> Result<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProcessingError::Geometry(format!(
                "Comuna '{}' has a non-finite vertex",
                comuna.name
            )));
        }

        match crs {
            CoordinateSystem::Geographic => {
                // GeoJSON order: x = longitude, y = latitude
                validate_coordinates(y, x).map_err(|e| {
                    ProcessingError::Geometry(format!("Comuna '{}': {}", comuna.name, e))
                })?;
                Ok(self.projection.forward(y, x))
            }
            CoordinateSystem::Utm { .. } => Ok((x, y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min_lon: f64, min_lat: f64, size: f64) -> Vec<Vec<Vec<[f64; 2]>>> {
        vec![vec![vec![
            [min_lon, min_lat],
            [min_lon + size, min_lat],
            [min_lon + size, min_lat + size],
            [min_lon, min_lat + size],
            [min_lon, min_lat],
        ]]]
    }

    #[test]
    fn test_centroid_of_geographic_square() {
        let calculator = CentroidCalculator::for_zone(19).unwrap();
        let comuna = Comuna::new("Santiago".into(), 13, "EPSG:4326", Some(square(-70.70, -33.50, 0.1)));

        let centroid = calculator.compute(&comuna).unwrap();

        // Small square: projected centroid lands within a few metres of the degree midpoint
        assert!((centroid.latitude - -33.45).abs() < 1e-3);
        assert!((centroid.longitude - -70.65).abs() < 1e-3);
        assert_eq!(centroid.name, "Santiago");
    }

    #[test]
    fn test_centroid_of_projected_square() {
        let calculator = CentroidCalculator::for_zone(19).unwrap();
        let projection = UtmProjection::south(19).unwrap();
        let (e, n) = projection.forward(-33.45, -70.65);

        let ring = vec![
            [e - 1000.0, n - 1000.0],
            [e + 1000.0, n - 1000.0],
            [e + 1000.0, n + 1000.0],
            [e - 1000.0, n + 1000.0],
            [e - 1000.0, n - 1000.0],
        ];
        let comuna = Comuna::new("Ñuñoa".into(), 13, "EPSG:32719", Some(vec![vec![ring]]));

        let centroid = calculator.compute(&comuna).unwrap();
        assert!((centroid.latitude - -33.45).abs() < 1e-6);
        assert!((centroid.longitude - -70.65).abs() < 1e-6);
    }

    #[test]
    fn test_hole_shifts_centroid() {
        let calculator = CentroidCalculator::for_zone(19).unwrap();
        let mut geometry = square(-70.70, -33.50, 0.2);
        // Carve out the western half of the square's interior
        geometry[0].push(vec![
            [-70.69, -33.49],
            [-70.61, -33.49],
            [-70.61, -33.31],
            [-70.69, -33.31],
            [-70.69, -33.49],
        ]);
        let comuna = Comuna::new("Maipú".into(), 13, "EPSG:4326", Some(geometry));

        let centroid = calculator.compute(&comuna).unwrap();
        assert!(centroid.longitude > -70.60);
    }

    #[test]
    fn test_missing_geometry_is_an_error() {
        let calculator = CentroidCalculator::for_zone(19).unwrap();
        let comuna = Comuna::new("Colina".into(), 13, "EPSG:4326", None);

        assert!(matches!(calculator.compute(&comuna), Err(ProcessingError::Geometry(_))));
    }

    #[test]
    fn test_incompatible_reference_system() {
        let calculator = CentroidCalculator::for_zone(19).unwrap();
        let zone_18 = Comuna::new("Lampa".into(), 13, "EPSG:32718", Some(square(300_000.0, 6_300_000.0, 1000.0)));
        let mercator = Comuna::new("Lampa".into(), 13, "EPSG:3857", Some(square(0.0, 0.0, 1.0)));

        assert!(matches!(calculator.compute(&zone_18), Err(ProcessingError::Geometry(_))));
        assert!(matches!(calculator.compute(&mercator), Err(ProcessingError::Geometry(_))));
    }

    #[test]
    fn test_empty_geometry_is_an_error() {
        let calculator = CentroidCalculator::for_zone(19).unwrap();
        let comuna = Comuna::new("Tiltil".into(), 13, "EPSG:4326", Some(vec![]));

        assert!(matches!(calculator.compute(&comuna), Err(ProcessingError::Geometry(_))));
    }
}
