//! Japanese plane rectangular coordinate system (JGD2011, zones 1..=19)

use super::transverse_mercator::{TransverseMercator, GRS80};
use super::{Geodetic, GeodeticProjector};
use crate::common::types::Projected;
use crate::error::ProjectionError;

pub const MIN_ZONE: i64 = 1;
pub const MAX_ZONE: i64 = 19;

const SCALE_FACTOR: f64 = 0.9999;

/// Latitudes at or beyond this are rejected as pole-adjacent (degrees)
const MAX_ABS_LATITUDE: f64 = 85.0;

/// Plane origins as (latitude deg, latitude min, longitude deg, longitude min)
const ZONE_ORIGINS: [(f64, f64, f64, f64); 19] = [
    (33.0, 0.0, 129.0, 30.0),
    (33.0, 0.0, 131.0, 0.0),
    (36.0, 0.0, 132.0, 10.0),
    (33.0, 0.0, 133.0, 30.0),
    (36.0, 0.0, 134.0, 20.0),
    (36.0, 0.0, 136.0, 0.0),
    (36.0, 0.0, 137.0, 10.0),
    (36.0, 0.0, 138.0, 30.0),
    (36.0, 0.0, 139.0, 50.0),
    (40.0, 0.0, 140.0, 50.0),
    (44.0, 0.0, 140.0, 15.0),
    (44.0, 0.0, 142.0, 15.0),
    (44.0, 0.0, 144.0, 15.0),
    (26.0, 0.0, 142.0, 0.0),
    (26.0, 0.0, 127.0, 30.0),
    (26.0, 0.0, 124.0, 0.0),
    (26.0, 0.0, 131.0, 0.0),
    (20.0, 0.0, 136.0, 0.0),
    (26.0, 0.0, 154.0, 0.0),
];

/// Origin of a zone in degrees, or `None` for an unsupported zone
pub fn zone_origin(zone: i64) -> Option<(f64, f64)> {
    if !(MIN_ZONE..=MAX_ZONE).contains(&zone) {
        return None;
    }
    let (lat_d, lat_m, lon_d, lon_m) = ZONE_ORIGINS[(zone - 1) as usize];
    Some((lat_d + lat_m / 60.0, lon_d + lon_m / 60.0))
}

/// Projector for one plane zone. Output is (x = northing, y = easting, h).
#[derive(Debug, Clone)]
pub struct PlaneProjector {
    zone: u8,
    tm: TransverseMercator,
}

impl PlaneProjector {
    /// Create a projector for `zone`, or `None` if the zone is unsupported
    pub fn new(zone: i64) -> Option<Self> {
        let (lat0, lon0) = zone_origin(zone)?;
        Some(PlaneProjector {
            zone: zone as u8,
            tm: TransverseMercator::new(
                GRS80,
                SCALE_FACTOR,
                lat0.to_radians(),
                lon0.to_radians(),
                0.0,
                0.0,
            ),
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }
}

impl GeodeticProjector for PlaneProjector {
    fn project(&self, llh: &Geodetic) -> Result<Projected, ProjectionError> {
        llh.check_finite()?;
        let lat_deg = llh.lat.to_degrees();
        if lat_deg.abs() >= MAX_ABS_LATITUDE {
            return Err(ProjectionError::LatitudeOutOfDomain {
                projection: "plane rectangular",
                lat_deg,
            });
        }
        if self.tm.delta_lon(llh.lon).abs() >= super::MAX_DELTA_LON {
            return Err(ProjectionError::LongitudeOutOfDomain {
                lon_deg: llh.lon.to_degrees(),
            });
        }
        let (x, y) = self.tm.forward(llh.lat, llh.lon);
        Ok(Projected::new(x, y, llh.height))
    }

    fn name(&self) -> &'static str {
        "plane"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geodetic(lat_deg: f64, lon_deg: f64, h: f64) -> Geodetic {
        Geodetic::from_degrees(lat_deg, lon_deg, h)
    }

    #[test]
    fn zone_range_is_enforced() {
        assert!(PlaneProjector::new(0).is_none());
        assert!(PlaneProjector::new(20).is_none());
        assert!(PlaneProjector::new(-3).is_none());
        assert_eq!(PlaneProjector::new(19).map(|p| p.zone()), Some(19));
    }

    #[test]
    fn zone_origin_maps_to_zero() {
        let projector = PlaneProjector::new(9).unwrap();
        let xyz = projector
            .project(&geodetic(36.0, 139.0 + 50.0 / 60.0, 5.0))
            .unwrap();
        assert!(xyz.x.abs() < 1e-6);
        assert!(xyz.y.abs() < 1e-6);
        assert_eq!(xyz.z, 5.0);
    }

    #[test]
    fn south_and_west_of_origin_is_negative() {
        let projector = PlaneProjector::new(9).unwrap();
        let xyz = projector.project(&geodetic(35.0, 139.0, 10.0)).unwrap();
        // Roughly one degree of latitude south, 50 arc minutes west
        assert!(xyz.x < -110_000.0 && xyz.x > -112_000.0, "x = {}", xyz.x);
        assert!(xyz.y < -75_000.0 && xyz.y > -77_000.0, "y = {}", xyz.y);
        assert_eq!(xyz.z, 10.0);
    }

    #[test]
    fn pole_adjacent_latitude_is_rejected() {
        let projector = PlaneProjector::new(11).unwrap();
        let err = projector.project(&geodetic(89.5, 140.0, 0.0)).unwrap_err();
        assert!(matches!(err, ProjectionError::LatitudeOutOfDomain { .. }));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let projector = PlaneProjector::new(7).unwrap();
        let err = projector
            .project(&geodetic(f64::NAN, 137.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::NonFinite { .. }));
    }
}
