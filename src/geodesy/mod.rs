//! Geodetic projection and height conversion
pub mod geoid_grid;
pub mod height;
pub mod mgrs;
pub mod plane;
pub mod transverse_mercator;

use crate::common::types::Projected;
use crate::error::{ConfigError, ProjectionError};
use std::fmt;

pub use self::geoid_grid::GeoidGrid;
pub use self::height::{
    ConstantGeoid, ConvertHeight, GeoidModel, HeightCorrection, HeightMode, HeightNormalizer,
};
pub use self::mgrs::MgrsProjector;
pub use self::plane::PlaneProjector;

/// Largest longitude offset from the central meridian the series is trusted for
pub(crate) const MAX_DELTA_LON: f64 = std::f64::consts::FRAC_PI_6;

/// Geodetic coordinate. Latitude and longitude in radians, height in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
}

impl Geodetic {
    pub fn new(lat: f64, lon: f64, height: f64) -> Self {
        Geodetic { lat, lon, height }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64, height: f64) -> Self {
        Geodetic::new(lat_deg.to_radians(), lon_deg.to_radians(), height)
    }

    pub(crate) fn check_finite(&self) -> Result<(), ProjectionError> {
        if self.lat.is_finite() && self.lon.is_finite() && self.height.is_finite() {
            Ok(())
        } else {
            Err(ProjectionError::NonFinite {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

/// Projects geodetic coordinates onto a plane.
///
/// The result is `(x0, x1, x2)` = (northing, easting, up); callers building
/// an east/north/up frame swap the first two axes.
#[cfg_attr(test, mockall::automock)]
pub trait GeodeticProjector: Send + Sync {
    fn project(&self, llh: &Geodetic) -> Result<Projected, ProjectionError>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Projection selector, `tf_num` in the parameter file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Plane,
    Mgrs,
}

impl TryFrom<i64> for ProjectionMode {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ProjectionMode::Plane),
            2 => Ok(ProjectionMode::Mgrs),
            other => Err(ConfigError::InvalidProjectionMode(other)),
        }
    }
}

/// A validated projection choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Plane { zone: u8 },
    Mgrs,
}

impl Projection {
    /// Resolve the mode and zone parameters. The zone is only checked for the plane mode.
    pub fn from_params(tf_num: i64, zone: i64) -> Result<Self, ConfigError> {
        match ProjectionMode::try_from(tf_num)? {
            ProjectionMode::Plane => {
                if plane::zone_origin(zone).is_none() {
                    return Err(ConfigError::InvalidZone(zone));
                }
                Ok(Projection::Plane { zone: zone as u8 })
            }
            ProjectionMode::Mgrs => Ok(Projection::Mgrs),
        }
    }

    /// Build the projector for this choice
    pub fn projector(&self) -> Result<Box<dyn GeodeticProjector>, ConfigError> {
        match *self {
            Projection::Plane { zone } => PlaneProjector::new(i64::from(zone))
                .map(|p| Box::new(p) as Box<dyn GeodeticProjector>)
                .ok_or(ConfigError::InvalidZone(i64::from(zone))),
            Projection::Mgrs => Ok(Box::new(MgrsProjector)),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Plane { zone } => write!(f, "plane zone {}", zone),
            Projection::Mgrs => f.write_str("mgrs"),
        }
    }
}
