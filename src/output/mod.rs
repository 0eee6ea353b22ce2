//! Output emitters for fused poses and transforms

use crate::common::msg::{PoseStamped, TransformStamped};
use log::warn;
use tokio::sync::mpsc::UnboundedSender;

/// Publishes fused poses. Fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait PoseSink: Send + Sync {
    fn publish(&self, pose: &PoseStamped);
}

/// Broadcasts the map to sensor transform. Fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait TransformBroadcaster: Send + Sync {
    fn send_transform(&self, transform: &TransformStamped);
}

/// The pair of outputs written on every fusion cycle
pub struct Emitters {
    pub pose: Box<dyn PoseSink>,
    pub transform: Box<dyn TransformBroadcaster>,
}

impl Emitters {
    pub fn new(pose: Box<dyn PoseSink>, transform: Box<dyn TransformBroadcaster>) -> Self {
        Emitters { pose, transform }
    }

    /// Use one channel emitter for both outputs
    pub fn from_channels(emitter: ChannelEmitter) -> Self {
        Emitters::new(Box::new(emitter.clone()), Box::new(emitter))
    }

    pub fn emit(&self, pose: &PoseStamped, transform: &TransformStamped) {
        self.pose.publish(pose);
        self.transform.send_transform(transform);
    }
}

/// Emitter that forwards outputs onto tokio channels
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    poses: UnboundedSender<PoseStamped>,
    transforms: UnboundedSender<TransformStamped>,
}

impl ChannelEmitter {
    pub fn new(
        poses: UnboundedSender<PoseStamped>,
        transforms: UnboundedSender<TransformStamped>,
    ) -> Self {
        ChannelEmitter { poses, transforms }
    }
}

impl PoseSink for ChannelEmitter {
    fn publish(&self, pose: &PoseStamped) {
        if self.poses.send(pose.clone()).is_err() {
            warn!("pose receiver closed, dropping pose");
        }
    }
}

impl TransformBroadcaster for ChannelEmitter {
    fn send_transform(&self, transform: &TransformStamped) {
        if self.transforms.send(transform.clone()).is_err() {
            warn!("transform receiver closed, dropping transform");
        }
    }
}
