//! Ellipsoidal / orthometric height conversion

use crate::error::{ConfigError, HeightError};
use std::fmt;

/// Converts heights between the ellipsoid and the geoid at a position given
/// in degrees.
#[cfg_attr(test, mockall::automock)]
pub trait HeightNormalizer: Send + Sync {
    /// Ellipsoidal height to orthometric height
    fn ellipsoid_to_orthometric(
        &self,
        lat_deg: f64,
        lon_deg: f64,
        height: f64,
    ) -> Result<f64, HeightError>;

    /// Orthometric height to ellipsoidal height
    fn orthometric_to_ellipsoid(
        &self,
        lat_deg: f64,
        lon_deg: f64,
        height: f64,
    ) -> Result<f64, HeightError>;
}

/// Geoid undulation N, the height of the geoid above the ellipsoid
pub trait GeoidModel: Send + Sync {
    fn undulation(&self, lat_deg: f64, lon_deg: f64) -> Result<f64, HeightError>;
}

/// Same undulation everywhere. Useful for small operating areas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantGeoid(pub f64);

impl GeoidModel for ConstantGeoid {
    fn undulation(&self, _lat_deg: f64, _lon_deg: f64) -> Result<f64, HeightError> {
        Ok(self.0)
    }
}

/// Height normalizer backed by a geoid model: h = H + N
pub struct ConvertHeight<G> {
    geoid: G,
}

impl<G: GeoidModel> ConvertHeight<G> {
    pub fn new(geoid: G) -> Self {
        ConvertHeight { geoid }
    }

    fn undulation(&self, lat_deg: f64, lon_deg: f64, height: f64) -> Result<f64, HeightError> {
        if !(lat_deg.is_finite() && lon_deg.is_finite() && height.is_finite()) {
            return Err(HeightError::NonFinite {
                lat: lat_deg,
                lon: lon_deg,
                height,
            });
        }
        self.geoid.undulation(lat_deg, lon_deg)
    }
}

impl<G: GeoidModel> HeightNormalizer for ConvertHeight<G> {
    fn ellipsoid_to_orthometric(
        &self,
        lat_deg: f64,
        lon_deg: f64,
        height: f64,
    ) -> Result<f64, HeightError> {
        Ok(height - self.undulation(lat_deg, lon_deg, height)?)
    }

    fn orthometric_to_ellipsoid(
        &self,
        lat_deg: f64,
        lon_deg: f64,
        height: f64,
    ) -> Result<f64, HeightError> {
        Ok(height + self.undulation(lat_deg, lon_deg, height)?)
    }
}

/// Height conversion selector, `convert_height_num` in the parameter file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightMode {
    #[default]
    None,
    EllipsoidToOrthometric,
    OrthometricToEllipsoid,
}

impl TryFrom<i64> for HeightMode {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HeightMode::None),
            1 => Ok(HeightMode::EllipsoidToOrthometric),
            2 => Ok(HeightMode::OrthometricToEllipsoid),
            other => Err(ConfigError::InvalidHeightMode(other)),
        }
    }
}

impl fmt::Display for HeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeightMode::None => "none",
            HeightMode::EllipsoidToOrthometric => "ellipsoid-to-orthometric",
            HeightMode::OrthometricToEllipsoid => "orthometric-to-ellipsoid",
        };
        f.write_str(name)
    }
}

/// The active height correction, holding its normalizer when one is needed
pub enum HeightCorrection {
    None,
    EllipsoidToOrthometric(Box<dyn HeightNormalizer>),
    OrthometricToEllipsoid(Box<dyn HeightNormalizer>),
}

impl HeightCorrection {
    /// Pair a mode with a normalizer. `None` mode ignores the normalizer.
    pub fn new(
        mode: HeightMode,
        normalizer: Option<Box<dyn HeightNormalizer>>,
    ) -> Result<Self, ConfigError> {
        match (mode, normalizer) {
            (HeightMode::None, _) => Ok(HeightCorrection::None),
            (HeightMode::EllipsoidToOrthometric, Some(n)) => {
                Ok(HeightCorrection::EllipsoidToOrthometric(n))
            }
            (HeightMode::OrthometricToEllipsoid, Some(n)) => {
                Ok(HeightCorrection::OrthometricToEllipsoid(n))
            }
            (_, None) => Err(ConfigError::MissingGeoid),
        }
    }

    pub fn mode(&self) -> HeightMode {
        match self {
            HeightCorrection::None => HeightMode::None,
            HeightCorrection::EllipsoidToOrthometric(_) => HeightMode::EllipsoidToOrthometric,
            HeightCorrection::OrthometricToEllipsoid(_) => HeightMode::OrthometricToEllipsoid,
        }
    }

    /// Corrected altitude for a fix in degrees
    pub fn apply(&self, lat_deg: f64, lon_deg: f64, altitude: f64) -> Result<f64, HeightError> {
        match self {
            HeightCorrection::None => Ok(altitude),
            HeightCorrection::EllipsoidToOrthometric(n) => {
                n.ellipsoid_to_orthometric(lat_deg, lon_deg, altitude)
            }
            HeightCorrection::OrthometricToEllipsoid(n) => {
                n.orthometric_to_ellipsoid(lat_deg, lon_deg, altitude)
            }
        }
    }
}

impl fmt::Debug for HeightCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeightCorrection({})", self.mode())
    }
}
