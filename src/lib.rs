//! Glowpath - progression path layout and adaptive render quality
//!
//! Core modules:
//! - `achievement`: achievement data model (closed category enum, node visual states)
//! - `layout`: deterministic responsive path/graph layout (geometry, config, branching, engine)
//! - `perf`: adaptive quality state machine, frame sampling, viewport culling
//!
//! The crate is a pure core: it produces path geometry and render settings
//! for an external renderer and never touches platform, audio, or persistence.
//! All public operations are synchronous, bounded-time, and total over their
//! input domain.

pub mod achievement;
pub mod layout;
pub mod perf;

pub use achievement::{Achievement, AchievementCategory, NodeVisualState};
pub use layout::{
    BranchConfig, NodePosition, Orientation, PathLayout, PathLayoutConfig, PathLayoutEngine,
    PathSegment, Rect, SizeCategory,
};
pub use perf::{FrameHistory, PerformanceController, QualityLevel, QualityState, RenderSettings};

use glam::Vec2;

/// Tunable constants
pub mod consts {
    /// Hard accessibility floor for node touch targets (device-independent units)
    pub const MIN_NODE_SIZE: f32 = 44.0;

    /// Frame budget for the 60fps target
    pub const TARGET_FRAME_MS: f32 = 16.67;
    /// Rolling frame-history window (samples)
    pub const FRAME_HISTORY_LEN: usize = 90;
    /// Minimum samples before the optimizer trusts the score
    pub const MIN_SAMPLES_FOR_SCORE: usize = 10;

    /// Performance score at or above this is "good"
    pub const SCORE_GOOD: f32 = 0.8;
    /// Performance score at or below this is "poor"
    pub const SCORE_POOR: f32 = 0.4;
    /// Seconds of accumulated tick time between optimizer evaluations
    pub const OPTIMIZER_INTERVAL_S: f32 = 0.5;
    /// Consecutive poor evaluations before stepping quality down
    pub const DEGRADE_STREAK: u32 = 3;
    /// Consecutive good evaluations before stepping quality up
    pub const RECOVER_STREAK: u32 = 4;

    /// Buffer added around the viewport for culling queries
    pub const CULL_MARGIN: f32 = 50.0;

    /// Samples per curve span when flattening smoothed paths
    pub const CURVE_SAMPLES_PER_SPAN: usize = 8;
}

/// Point on a quadratic bezier at parameter `t` in [0, 1]
#[inline]
pub fn quadratic_point(p0: Vec2, ctrl: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + ctrl * (2.0 * u * t) + p1 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_point_endpoints() {
        let p0 = Vec2::new(0.0, 0.0);
        let c = Vec2::new(5.0, 10.0);
        let p1 = Vec2::new(10.0, 0.0);
        assert!(quadratic_point(p0, c, p1, 0.0).distance(p0) < 1e-5);
        assert!(quadratic_point(p0, c, p1, 1.0).distance(p1) < 1e-5);
    }

    #[test]
    fn test_quadratic_point_midpoint_pulls_toward_control() {
        let p0 = Vec2::ZERO;
        let c = Vec2::new(5.0, 10.0);
        let p1 = Vec2::new(10.0, 0.0);
        let mid = quadratic_point(p0, c, p1, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-5);
        assert!(mid.y > 0.0 && mid.y < 10.0);
    }
}
