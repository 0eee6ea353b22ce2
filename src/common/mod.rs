//! Common utilities and types for the fix2pose pipeline
pub mod msg;

use nalgebra::UnitQuaternion;
use std::f64::consts::{FRAC_PI_2, PI};

/// Common types used across the codebase
pub mod types {
    /// A planar projection result (northing, easting, up)
    pub type Projected = nalgebra::Vector3<f64>;
}

/// Wrap an angle into [0, 2π)
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= 2.0 * PI {
        0.0
    } else {
        wrapped
    }
}

/// Re-base a north-referenced bearing onto the map frame's yaw
pub fn heading_to_yaw(heading_angle: f64) -> f64 {
    FRAC_PI_2 - wrap_two_pi(heading_angle)
}

/// Quaternion for (roll = 0, pitch = 0, yaw)
pub fn quaternion_from_yaw(yaw: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(0.0, 0.0, yaw)
}
