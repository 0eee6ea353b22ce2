//! Fix-triggered fusion of the cached heading with the projected fix

use super::cache::EstimateCache;
use crate::common::msg::{
    Header, Heading, NavSatFix, Pose, PoseStamped, Position, Transform, TransformStamped,
    MAP_FRAME_ID,
};
use crate::common::quaternion_from_yaw;
use crate::config::FusionConfig;
use crate::error::{ConfigError, FusionError};
use crate::geodesy::{Geodetic, GeodeticProjector, HeightCorrection};
use crate::output::Emitters;
use log::{debug, warn};
use nalgebra::Vector3;

/// Pose and transform produced for one fix
#[derive(Debug, Clone, PartialEq)]
pub struct FusedOutput {
    pub pose: PoseStamped,
    pub transform: TransformStamped,
}

/// Event counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FusionStats {
    pub headings: u64,
    pub positions: u64,
    pub fixes: u64,
    pub emitted: u64,
    pub dropped: u64,
}

/// Owns the estimate cache, the geodetic collaborators and the emitters.
///
/// Handlers take `&mut self`; whoever drives the service must deliver events
/// one at a time.
pub struct FusionService {
    cache: EstimateCache,
    projector: Box<dyn GeodeticProjector>,
    height: HeightCorrection,
    emitters: Emitters,
    parent_frame_id: String,
    child_frame_id: String,
    stats: FusionStats,
}

impl FusionService {
    pub fn new(
        projector: Box<dyn GeodeticProjector>,
        height: HeightCorrection,
        emitters: Emitters,
        parent_frame_id: &str,
        child_frame_id: &str,
    ) -> Self {
        FusionService {
            cache: EstimateCache::new(),
            projector,
            height,
            emitters,
            parent_frame_id: parent_frame_id.to_string(),
            child_frame_id: child_frame_id.to_string(),
            stats: FusionStats::default(),
        }
    }

    /// Build the projector and height stage described by `config`
    pub fn from_config(config: &FusionConfig, emitters: Emitters) -> Result<Self, ConfigError> {
        Ok(FusionService::new(
            config.projection.projector()?,
            config.height_correction()?,
            emitters,
            &config.parent_frame_id,
            &config.child_frame_id,
        ))
    }

    pub fn handle_heading(&mut self, msg: Heading) {
        self.stats.headings += 1;
        self.cache.update_heading(msg);
    }

    pub fn handle_position(&mut self, msg: Position) {
        self.stats.positions += 1;
        self.cache.update_position(msg);
    }

    /// Fuse one fix and emit the result. On error nothing is emitted.
    pub fn handle_fix(&mut self, fix: &NavSatFix) -> Result<FusedOutput, FusionError> {
        self.stats.fixes += 1;
        match self.fuse(fix) {
            Ok(output) => {
                self.emitters.emit(&output.pose, &output.transform);
                self.stats.emitted += 1;
                debug!(
                    "fused fix at {}.{:09}: x={:.3} y={:.3} z={:.3} yaw={:.4}",
                    fix.header.stamp.sec,
                    fix.header.stamp.nanosec,
                    output.pose.pose.position.x,
                    output.pose.pose.position.y,
                    output.pose.pose.position.z,
                    output.pose.pose.orientation.yaw()
                );
                Ok(output)
            }
            Err(e) => {
                self.stats.dropped += 1;
                warn!(
                    "dropping fix ({:.7}, {:.7}) via {}: {}",
                    fix.latitude,
                    fix.longitude,
                    self.projector.name(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Compute the outputs for a fix from the current cache, without emitting
    pub fn fuse(&self, fix: &NavSatFix) -> Result<FusedOutput, FusionError> {
        let altitude = self.height.apply(fix.latitude, fix.longitude, fix.altitude)?;
        let llh = Geodetic::from_degrees(fix.latitude, fix.longitude, altitude);
        let xyz = self.projector.project(&llh)?;

        let orientation = quaternion_from_yaw(self.cache.heading_yaw()).into();
        // Projector axes are (north, east, up); the map frame is (east, north, up)
        let position = Vector3::new(xyz[1], xyz[0], xyz[2]).into();

        let pose = PoseStamped {
            header: Header {
                stamp: fix.header.stamp,
                frame_id: MAP_FRAME_ID.to_string(),
            },
            pose: Pose {
                position,
                orientation,
            },
        };
        let transform = TransformStamped {
            header: Header {
                stamp: fix.header.stamp,
                frame_id: self.parent_frame_id.clone(),
            },
            child_frame_id: self.child_frame_id.clone(),
            transform: Transform {
                translation: position,
                rotation: orientation,
            },
        };
        Ok(FusedOutput { pose, transform })
    }

    pub fn cache(&self) -> &EstimateCache {
        &self.cache
    }

    pub fn stats(&self) -> FusionStats {
        self.stats
    }
}
