//! UTM and MGRS grid-local coordinates

use super::transverse_mercator::{TransverseMercator, WGS84};
use super::{Geodetic, GeodeticProjector};
use crate::common::types::Projected;
use crate::error::ProjectionError;

const UTM_SCALE_FACTOR: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
const UTM_MIN_LATITUDE: f64 = -80.0;
const UTM_MAX_LATITUDE: f64 = 84.0;

/// Side of an MGRS 100 km grid square (m)
pub const GRID_SQUARE: f64 = 100_000.0;

/// A UTM coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utm {
    pub zone: u8,
    pub northern: bool,
    pub easting: f64,
    pub northing: f64,
}

/// UTM zone for a position in degrees, including the Norway and Svalbard exceptions
pub fn utm_zone(lat_deg: f64, lon_deg: f64) -> u8 {
    let lon = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    let mut zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    if zone > 60 {
        zone = 60;
    }

    if (56.0..64.0).contains(&lat_deg) && (3.0..12.0).contains(&lon) {
        zone = 32;
    } else if (72.0..=84.0).contains(&lat_deg) && lon >= 0.0 && lon < 42.0 {
        zone = match lon {
            l if l < 9.0 => 31,
            l if l < 21.0 => 33,
            l if l < 33.0 => 35,
            _ => 37,
        };
    }
    zone as u8
}

/// Forward UTM projection
pub fn utm_forward(llh: &Geodetic) -> Result<Utm, ProjectionError> {
    llh.check_finite()?;
    let lat_deg = llh.lat.to_degrees();
    if !(UTM_MIN_LATITUDE..=UTM_MAX_LATITUDE).contains(&lat_deg) {
        return Err(ProjectionError::LatitudeOutOfDomain {
            projection: "UTM",
            lat_deg,
        });
    }

    let zone = utm_zone(lat_deg, llh.lon.to_degrees());
    let central_meridian = (f64::from(zone) * 6.0 - 183.0).to_radians();
    let northern = lat_deg >= 0.0;
    let false_northing = if northern { 0.0 } else { UTM_FALSE_NORTHING_SOUTH };

    let tm = TransverseMercator::new(
        WGS84,
        UTM_SCALE_FACTOR,
        0.0,
        central_meridian,
        UTM_FALSE_EASTING,
        false_northing,
    );
    let (northing, easting) = tm.forward(llh.lat, llh.lon);
    Ok(Utm {
        zone,
        northern,
        easting,
        northing,
    })
}

/// Projector producing coordinates local to the MGRS 100 km square.
/// Output is (northing, easting, h), matching the plane projector's axis order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MgrsProjector;

impl GeodeticProjector for MgrsProjector {
    fn project(&self, llh: &Geodetic) -> Result<Projected, ProjectionError> {
        let utm = utm_forward(llh)?;
        Ok(Projected::new(
            utm.northing.rem_euclid(GRID_SQUARE),
            utm.easting.rem_euclid(GRID_SQUARE),
            llh.height,
        ))
    }

    fn name(&self) -> &'static str {
        "mgrs"
    }
}
