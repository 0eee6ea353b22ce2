//! Parameter loading for the fix2pose node
//!
//! Parameters keep the names used by the localization stack's launch files
//! and may be given either as a ROS 2 parameter file
//! (`fix2pose: ros__parameters: {...}`) or as a flat YAML mapping.

use crate::error::{ConfigError, Result};
use crate::geodesy::{
    ConstantGeoid, ConvertHeight, GeoidGrid, HeightCorrection, HeightMode, HeightNormalizer,
    Projection,
};
use log::info;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Node name under which parameters are looked up
pub const NODE_NAME: &str = "fix2pose";

const ROS_PARAMETERS_KEY: &str = "ros__parameters";

/// Parameters as written in the file, before validation
#[derive(Clone, Debug, Deserialize)]
pub struct Fix2PoseParams {
    /// Plane rectangular zone (default: 7)
    #[serde(default = "default_plane")]
    pub plane: i64,

    /// 1 = plane rectangular, 2 = MGRS (default: 1)
    #[serde(default = "default_tf_num")]
    pub tf_num: i64,

    /// 0 = none, 1 = ellipsoid to orthometric, 2 = orthometric to ellipsoid (default: 0)
    #[serde(default)]
    pub convert_height_num: i64,

    #[serde(default = "default_parent_frame_id")]
    pub parent_frame_id: String,

    #[serde(default = "default_child_frame_id")]
    pub child_frame_id: String,

    /// GSI ASCII geoid grid used for height conversion
    #[serde(default)]
    pub geoid_path: Option<PathBuf>,

    /// Constant geoid undulation (m), used when no grid is given
    #[serde(default)]
    pub geoid_undulation: Option<f64>,
}

fn default_plane() -> i64 {
    7
}

fn default_tf_num() -> i64 {
    1
}

fn default_parent_frame_id() -> String {
    "map".to_string()
}

fn default_child_frame_id() -> String {
    "gnss".to_string()
}

impl Default for Fix2PoseParams {
    fn default() -> Self {
        Fix2PoseParams {
            plane: default_plane(),
            tf_num: default_tf_num(),
            convert_height_num: 0,
            parent_frame_id: default_parent_frame_id(),
            child_frame_id: default_child_frame_id(),
            geoid_path: None,
            geoid_undulation: None,
        }
    }
}

/// Where geoid undulations come from
#[derive(Clone, Debug, PartialEq)]
pub enum GeoidSource {
    Grid(PathBuf),
    Constant(f64),
}

/// Validated configuration, fixed for the life of the process
#[derive(Clone, Debug, PartialEq)]
pub struct FusionConfig {
    pub projection: Projection,
    pub height_mode: HeightMode,
    pub parent_frame_id: String,
    pub child_frame_id: String,
    pub geoid: Option<GeoidSource>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        // The default parameters are always valid
        FusionConfig {
            projection: Projection::Plane {
                zone: default_plane() as u8,
            },
            height_mode: HeightMode::None,
            parent_frame_id: default_parent_frame_id(),
            child_frame_id: default_child_frame_id(),
            geoid: None,
        }
    }
}

impl TryFrom<Fix2PoseParams> for FusionConfig {
    type Error = ConfigError;

    fn try_from(params: Fix2PoseParams) -> Result<Self> {
        let projection = Projection::from_params(params.tf_num, params.plane)?;
        let height_mode = HeightMode::try_from(params.convert_height_num)?;

        if params.parent_frame_id.trim().is_empty() {
            return Err(ConfigError::EmptyFrameId("parent_frame_id"));
        }
        if params.child_frame_id.trim().is_empty() {
            return Err(ConfigError::EmptyFrameId("child_frame_id"));
        }

        let geoid = match (params.geoid_path, params.geoid_undulation) {
            (Some(path), _) => Some(GeoidSource::Grid(path)),
            (None, Some(n)) if !n.is_finite() => return Err(ConfigError::InvalidUndulation(n)),
            (None, Some(n)) => Some(GeoidSource::Constant(n)),
            (None, None) => None,
        };
        if height_mode != HeightMode::None && geoid.is_none() {
            return Err(ConfigError::MissingGeoid);
        }

        Ok(FusionConfig {
            projection,
            height_mode,
            parent_frame_id: params.parent_frame_id,
            child_frame_id: params.child_frame_id,
            geoid,
        })
    }
}

impl FusionConfig {
    /// Parse and validate parameters from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(text)?;
        let params = match node_parameters(document) {
            Value::Null => Fix2PoseParams::default(),
            value => serde_yaml::from_value(value)?,
        };
        FusionConfig::try_from(params)
    }

    /// Load and validate a parameter file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Build the height correction stage, loading the geoid model if one is needed
    pub fn height_correction(&self) -> Result<HeightCorrection> {
        if self.height_mode == HeightMode::None {
            return Ok(HeightCorrection::None);
        }
        let normalizer: Box<dyn HeightNormalizer> = match &self.geoid {
            Some(GeoidSource::Grid(path)) => {
                Box::new(ConvertHeight::new(GeoidGrid::from_file(path)?))
            }
            Some(GeoidSource::Constant(n)) => Box::new(ConvertHeight::new(ConstantGeoid(*n))),
            None => return Err(ConfigError::MissingGeoid),
        };
        HeightCorrection::new(self.height_mode, Some(normalizer))
    }

    pub fn log_parameters(&self) {
        info!("projection: {}", self.projection);
        info!("height conversion: {}", self.height_mode);
        info!("parent_frame_id: {}", self.parent_frame_id);
        info!("child_frame_id: {}", self.child_frame_id);
        if let Some(geoid) = &self.geoid {
            info!("geoid: {:?}", geoid);
        }
    }
}

/// Strip the `<node>: ros__parameters:` nesting if present
fn node_parameters(document: Value) -> Value {
    let nested = |node: &Value| node.get(ROS_PARAMETERS_KEY).cloned();

    if let Some(params) = document.get(NODE_NAME).and_then(nested) {
        return params;
    }
    // Wildcard or renamed node entries, e.g. `/**:`
    if let Value::Mapping(map) = &document {
        if let Some(params) = map.values().find_map(nested) {
            return params;
        }
    }
    document
}
