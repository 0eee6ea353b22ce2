//! Fusion of a GNSS fix with heading and position estimates into a map-frame
//! pose and transform.
pub mod common;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geodesy;
pub mod localization;
pub mod node;
pub mod output;

pub use crate::config::FusionConfig;
pub use crate::dispatch::{Dispatcher, InboundEvent};
pub use crate::error::{ConfigError, FusionError, LineError};
pub use crate::localization::{FusedOutput, FusionService, FusionStats};
pub use crate::output::{ChannelEmitter, Emitters};
