//! Message types exchanged with the rest of the localization pipeline
//!
//! Field names follow the ROS interface definitions (`std_msgs`,
//! `geometry_msgs`, `sensor_msgs` and the estimator's own messages) so that
//! recorded streams can be replayed without translation.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Frame in which fused poses are expressed
pub const MAP_FRAME_ID: &str = "map";

/// Timestamp as seconds and nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl Time {
    pub fn new(sec: i32, nanosec: u32) -> Self {
        Time { sec, nanosec }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub stamp: Time,
    #[serde(default)]
    pub frame_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vector3<f64>> for Point {
    fn from(v: Vector3<f64>) -> Self {
        Point {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Quaternion in (x, y, z, w) order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<UnitQuaternion<f64>> for Quaternion {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Quaternion {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

impl Quaternion {
    /// Yaw angle about the z axis
    pub fn yaw(&self) -> f64 {
        (2.0 * (self.w * self.z + self.x * self.y))
            .atan2(1.0 - 2.0 * (self.y * self.y + self.z * self.z))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Point,
    pub rotation: Quaternion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub transform: Transform,
}

/// Raw satellite-navigation fix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavSatFix {
    #[serde(default)]
    pub header: Header,
    /// Degrees, positive north
    pub latitude: f64,
    /// Degrees, positive east
    pub longitude: f64,
    /// Metres
    pub altitude: f64,
}

/// Validity flags attached to an estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateStatus {
    #[serde(default)]
    pub enabled_status: bool,
    #[serde(default)]
    pub estimate_status: bool,
}

/// Heading estimate; the angle is a bearing in radians, 0 = north
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(default)]
    pub header: Header,
    pub heading_angle: f64,
    #[serde(default)]
    pub status: EstimateStatus,
}

impl Heading {
    pub fn is_valid(&self) -> bool {
        self.status.enabled_status
    }
}

/// Absolute position estimate in a local ENU frame anchored at an ECEF origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub header: Header,
    pub enu_pos: Point,
    pub ecef_base_pos: Point,
    #[serde(default)]
    pub status: EstimateStatus,
}

impl Position {
    pub fn is_valid(&self) -> bool {
        self.status.enabled_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quaternion_is_identity() {
        let q = Quaternion::default();
        assert_eq!(q.w, 1.0);
        assert_eq!(q.yaw(), 0.0);
    }

    #[test]
    fn heading_without_status_is_invalid() {
        let heading: Heading = serde_json::from_str(r#"{"heading_angle": 1.0}"#).unwrap();
        assert!(!heading.is_valid());
        assert_eq!(heading.header.stamp, Time::default());
    }

    #[test]
    fn quaternion_conversion_keeps_yaw() {
        let q: Quaternion = UnitQuaternion::from_euler_angles(0.0, 0.0, -1.2).into();
        assert!((q.yaw() + 1.2).abs() < 1e-12);
    }
}
