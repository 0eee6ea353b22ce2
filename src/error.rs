//! Error types for fix2pose

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration errors. Any of these prevents the node from serving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid projection mode tf_num={0} (expected 1 = plane, 2 = mgrs)")]
    InvalidProjectionMode(i64),

    #[error("invalid height conversion mode convert_height_num={0} (expected 0, 1 or 2)")]
    InvalidHeightMode(i64),

    #[error("plane zone {0} is outside the supported range 1..=19")]
    InvalidZone(i64),

    #[error("{0} must not be empty")]
    EmptyFrameId(&'static str),

    #[error("height conversion requires geoid_path or geoid_undulation")]
    MissingGeoid,

    #[error("geoid_undulation must be finite, got {0}")]
    InvalidUndulation(f64),

    #[error("{0} requires a value")]
    MissingArgument(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse parameters: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid geoid grid: {0}")]
    Geoid(String),
}

/// The projector rejected a coordinate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("non-finite coordinate ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },

    #[error("latitude {lat_deg:.6} deg is outside the {projection} domain")]
    LatitudeOutOfDomain {
        projection: &'static str,
        lat_deg: f64,
    },

    #[error("longitude {lon_deg:.6} deg is too far from the central meridian")]
    LongitudeOutOfDomain { lon_deg: f64 },
}

/// The height normalizer could not convert a height
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeightError {
    #[error("non-finite height input ({lat}, {lon}, {height})")]
    NonFinite { lat: f64, lon: f64, height: f64 },

    #[error("({lat:.6}, {lon:.6}) is outside the geoid grid")]
    OutsideGrid { lat: f64, lon: f64 },

    #[error("geoid grid has no data around ({lat:.6}, {lon:.6})")]
    MissingData { lat: f64, lon: f64 },
}

/// Reason a fusion cycle was abandoned
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("height conversion failed: {0}")]
    Height(#[from] HeightError),
}

/// An input line that could not be turned into an event
#[derive(Error, Debug)]
pub enum LineError {
    #[error("not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("not a known event: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
