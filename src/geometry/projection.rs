//! Universal Transverse Mercator on the WGS84 ellipsoid.
//!
//! Series expansions after Snyder, *Map Projections: A Working Manual*
//! (USGS PP 1395), accurate to well under a metre inside a zone.

use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;
use std::fmt;
use std::str::FromStr;

/// Reference systems accepted for comuna geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// EPSG:4326, (longitude, latitude) in degrees
    Geographic,
    /// EPSG:326zz (north) or EPSG:327zz (south), metres
    Utm { zone: u8, south: bool },
}

impl CoordinateSystem {
    pub fn epsg(&self) -> u32 {
        match self {
            CoordinateSystem::Geographic => EPSG_WGS84,
            CoordinateSystem::Utm { zone, south: true } => EPSG_UTM_SOUTH_BASE + *zone as u32,
            CoordinateSystem::Utm { zone, south: false } => EPSG_UTM_NORTH_BASE + *zone as u32,
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for CoordinateSystem {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = trimmed
            .to_ascii_uppercase()
            .strip_prefix("EPSG:")
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string());

        let epsg = code.parse::<u32>().map_err(|_| {
            ProcessingError::Geometry(format!("Unrecognized coordinate reference system '{}'", s))
        })?;

        match epsg {
            EPSG_WGS84 => Ok(CoordinateSystem::Geographic),
            c if (EPSG_UTM_NORTH_BASE + 1..=EPSG_UTM_NORTH_BASE + 60).contains(&c) => {
                Ok(CoordinateSystem::Utm {
                    zone: (c - EPSG_UTM_NORTH_BASE) as u8,
                    south: false,
                })
            }
            c if (EPSG_UTM_SOUTH_BASE + 1..=EPSG_UTM_SOUTH_BASE + 60).contains(&c) => {
                Ok(CoordinateSystem::Utm {
                    zone: (c - EPSG_UTM_SOUTH_BASE) as u8,
                    south: true,
                })
            }
            _ => Err(ProcessingError::Geometry(format!(
                "Unsupported coordinate reference system '{}'",
                s
            ))),
        }
    }
}

/// Forward/inverse transform for a single UTM zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmProjection {
    zone: u8,
    south: bool,
}

impl UtmProjection {
    pub fn new(zone: u8, south: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(ProcessingError::Geometry(format!(
                "UTM zone must be between 1 and 60, got {}",
                zone
            )));
        }
        Ok(Self { zone, south })
    }

    pub fn south(zone: u8) -> Result<Self> {
        Self::new(zone, true)
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        CoordinateSystem::Utm {
            zone: self.zone,
            south: self.south,
        }
    }

    fn central_meridian(&self) -> f64 {
        (self.zone as f64 * 6.0 - 183.0).to_radians()
    }

    /// (latitude, longitude) in degrees → (easting, northing) in metres
    pub fn forward(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let a = WGS84_SEMI_MAJOR_AXIS;
        let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);
        let k0 = UTM_SCALE_FACTOR;

        let phi = latitude.to_radians();
        let lambda = longitude.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let big_a = cos_phi * (lambda - self.central_meridian());

        let m = a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

        let a2 = big_a * big_a;
        let a3 = a2 * big_a;
        let a4 = a3 * big_a;
        let a5 = a4 * big_a;
        let a6 = a5 * big_a;

        let easting = k0
            * n
            * (big_a
                + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
            + UTM_FALSE_EASTING;

        let mut northing = k0
            * (m + n
                * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        if self.south {
            northing += UTM_FALSE_NORTHING_SOUTH;
        }

        (easting, northing)
    }

    /// (easting, northing) in metres → (latitude, longitude) in degrees
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let a = WGS84_SEMI_MAJOR_AXIS;
        let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);
        let k0 = UTM_SCALE_FACTOR;

        let x = easting - UTM_FALSE_EASTING;
        let y = if self.south {
            northing - UTM_FALSE_NORTHING_SOUTH
        } else {
            northing
        };

        let m = y / k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let denom = 1.0 - e2 * sin_phi1 * sin_phi1;

        let n1 = a / denom.sqrt();
        let t1 = tan_phi1 * tan_phi1;
        let c1 = ep2 * cos_phi1 * cos_phi1;
        let r1 = a * (1.0 - e2) / denom.powf(1.5);
        let d = x / (n1 * k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let phi = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lambda = self.central_meridian()
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                    / 120.0)
                / cos_phi1;

        (phi.to_degrees(), lambda.to_degrees())
    }
}
