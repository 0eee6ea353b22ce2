//! Localization: estimate cache and fix-triggered fusion
pub mod cache;
pub mod fusion;

pub use self::cache::EstimateCache;
pub use self::fusion::{FusedOutput, FusionService, FusionStats};
