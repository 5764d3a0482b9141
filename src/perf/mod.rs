//! Adaptive performance control
//!
//! Frame-time driven quality management and viewport culling:
//! - `sample`: bounded frame-duration history and the performance score
//! - `quality`: ordered quality tiers and the derived render contract
//! - `controller`: the hysteresis state machine and culling oracle

pub mod controller;
pub mod quality;
pub mod sample;

pub use controller::{PerformanceController, QualityState};
pub use quality::{QualityLevel, RenderSettings};
pub use sample::FrameHistory;
