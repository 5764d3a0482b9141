//! Quality tiers and the render contract they project to

use serde::{Deserialize, Serialize};

/// Quality tier, ordered `Low < Medium < High < Ultra`. Used independently
/// for particle quality and graphics quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Low => "Low",
            QualityLevel::Medium => "Medium",
            QualityLevel::High => "High",
            QualityLevel::Ultra => "Ultra",
        }
    }

    /// Particle budget for this tier
    pub fn max_particles(&self) -> usize {
        match self {
            QualityLevel::Low => 30,
            QualityLevel::Medium => 80,
            QualityLevel::High => 150,
            QualityLevel::Ultra => 250,
        }
    }

    /// Render scale applied to glow intensity and effect resolution
    pub fn render_scale(&self) -> f32 {
        match self {
            QualityLevel::Low => 0.5,
            QualityLevel::Medium => 0.75,
            QualityLevel::High => 1.0,
            QualityLevel::Ultra => 1.0,
        }
    }

    /// One tier down, saturating at `Low`
    pub fn step_down(&self) -> Self {
        match self {
            QualityLevel::Ultra => QualityLevel::High,
            QualityLevel::High => QualityLevel::Medium,
            QualityLevel::Medium | QualityLevel::Low => QualityLevel::Low,
        }
    }

    /// One tier up, saturating at `Ultra`
    pub fn step_up(&self) -> Self {
        match self {
            QualityLevel::Low => QualityLevel::Medium,
            QualityLevel::Medium => QualityLevel::High,
            QualityLevel::High | QualityLevel::Ultra => QualityLevel::Ultra,
        }
    }
}

/// Per-frame rendering contract derived from the quality state.
/// A pure projection: computing it has no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub glow_enabled: bool,
    /// Glow strength, equal to the current quality scale
    pub glow_intensity: f32,
    pub anti_aliasing: bool,
    pub quality_scale: f32,
    /// Hint to batch path strokes into fewer draw calls
    pub batch_draw_calls: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_budget_is_monotonic() {
        let tiers = [
            QualityLevel::Low,
            QualityLevel::Medium,
            QualityLevel::High,
            QualityLevel::Ultra,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].max_particles() < pair[1].max_particles());
            assert!(pair[0].render_scale() <= pair[1].render_scale());
        }
    }

    #[test]
    fn test_stepping_saturates() {
        assert_eq!(QualityLevel::Low.step_down(), QualityLevel::Low);
        assert_eq!(QualityLevel::Ultra.step_up(), QualityLevel::Ultra);
        assert_eq!(QualityLevel::High.step_down(), QualityLevel::Medium);
        assert_eq!(QualityLevel::Medium.step_up(), QualityLevel::High);
    }
}
