//! Latest heading and position estimates

use crate::common::heading_to_yaw;
use crate::common::msg::{Heading, Position};

/// Holds the most recent estimate from each estimator stream
#[derive(Debug, Clone, Default)]
pub struct EstimateCache {
    heading: Heading,
    position: Position,
}

impl EstimateCache {
    /// Create a cache with nothing received; both estimates start invalid
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached heading
    pub fn update_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    /// Overwrite the cached position
    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn current_heading(&self) -> &Heading {
        &self.heading
    }

    pub fn current_position(&self) -> &Position {
        &self.position
    }

    /// Map-frame yaw from the cached heading, 0 while the heading is invalid
    /// or its angle is not finite
    pub fn heading_yaw(&self) -> f64 {
        if self.heading.is_valid() && self.heading.heading_angle.is_finite() {
            heading_to_yaw(self.heading.heading_angle)
        } else {
            0.0
        }
    }
}
