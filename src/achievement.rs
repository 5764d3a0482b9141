//! Achievement data model
//!
//! Achievements are owned by an external subsystem (persistence, progress
//! tracking) and re-supplied wholesale on every refresh. This crate treats
//! them as immutable values and never mutates progress or unlock state.

use serde::{Deserialize, Serialize};

/// Achievement categories. `Score` owns the main path; every other
/// category gets a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementCategory {
    Score,
    TotalScore,
    GamesPlayed,
    PulseUsage,
    PowerUps,
    Survival,
}

impl AchievementCategory {
    /// All categories, in declaration order
    pub const ALL: [AchievementCategory; 6] = [
        AchievementCategory::Score,
        AchievementCategory::TotalScore,
        AchievementCategory::GamesPlayed,
        AchievementCategory::PulseUsage,
        AchievementCategory::PowerUps,
        AchievementCategory::Survival,
    ];

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            AchievementCategory::Score => "Score",
            AchievementCategory::TotalScore => "Total Score",
            AchievementCategory::GamesPlayed => "Games Played",
            AchievementCategory::PulseUsage => "Pulse Usage",
            AchievementCategory::PowerUps => "Power-Ups",
            AchievementCategory::Survival => "Survival",
        }
    }

    /// Stable key for segment ids and lookups
    pub fn key(&self) -> &'static str {
        match self {
            AchievementCategory::Score => "score",
            AchievementCategory::TotalScore => "total_score",
            AchievementCategory::GamesPlayed => "games_played",
            AchievementCategory::PulseUsage => "pulse_usage",
            AchievementCategory::PowerUps => "power_ups",
            AchievementCategory::Survival => "survival",
        }
    }

    /// Neon palette color for path strokes and node glow, packed 0xRRGGBBAA
    pub fn color(&self) -> u32 {
        match self {
            AchievementCategory::Score => 0x00_E5_FF_FF,       // cyan
            AchievementCategory::TotalScore => 0xFF_2D_95_FF,  // magenta
            AchievementCategory::GamesPlayed => 0x7C_4D_FF_FF, // violet
            AchievementCategory::PulseUsage => 0x00_FF_9C_FF,  // green
            AchievementCategory::PowerUps => 0xFF_B3_00_FF,    // amber
            AchievementCategory::Survival => 0xFF_45_45_FF,    // red
        }
    }
}

/// Visual state of an achievement node, derived deterministically from
/// progress and reward presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeVisualState {
    Locked,
    InProgress,
    Unlocked,
    RewardAvailable,
}

/// An achievement as supplied by the external achievement subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique key
    pub id: String,
    pub category: AchievementCategory,
    /// Value at which the achievement unlocks
    pub target_value: f32,
    /// Current progress toward the target
    pub current_progress: f32,
    pub unlocked: bool,
    /// Cosmetic skin granted on unlock, if any
    pub reward_skin: Option<String>,
}

impl Achievement {
    /// Fraction of the target reached, clamped to [0, 1]
    pub fn progress_fraction(&self) -> f32 {
        if self.unlocked {
            return 1.0;
        }
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_progress / self.target_value).clamp(0.0, 1.0)
    }

    /// Derive the node visual state from progress and reward presence
    pub fn visual_state(&self) -> NodeVisualState {
        if self.unlocked {
            if self.reward_skin.is_some() {
                NodeVisualState::RewardAvailable
            } else {
                NodeVisualState::Unlocked
            }
        } else if self.current_progress > 0.0 {
            NodeVisualState::InProgress
        } else {
            NodeVisualState::Locked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement(progress: f32, unlocked: bool, reward: Option<&str>) -> Achievement {
        Achievement {
            id: "test".into(),
            category: AchievementCategory::Score,
            target_value: 100.0,
            current_progress: progress,
            unlocked,
            reward_skin: reward.map(String::from),
        }
    }

    #[test]
    fn test_visual_state_derivation() {
        assert_eq!(achievement(0.0, false, None).visual_state(), NodeVisualState::Locked);
        assert_eq!(
            achievement(50.0, false, None).visual_state(),
            NodeVisualState::InProgress
        );
        assert_eq!(
            achievement(100.0, true, None).visual_state(),
            NodeVisualState::Unlocked
        );
        assert_eq!(
            achievement(100.0, true, Some("neon_trail")).visual_state(),
            NodeVisualState::RewardAvailable
        );
    }

    #[test]
    fn test_progress_fraction_clamps() {
        assert!((achievement(250.0, false, None).progress_fraction() - 1.0).abs() < 1e-6);
        assert!((achievement(-5.0, false, None).progress_fraction()).abs() < 1e-6);
        // Zero target never divides
        let mut a = achievement(10.0, false, None);
        a.target_value = 0.0;
        assert_eq!(a.progress_fraction(), 0.0);
        // Unlocked reports full regardless of raw progress
        assert_eq!(achievement(1.0, true, None).progress_fraction(), 1.0);
    }

    #[test]
    fn test_category_tables_are_exhaustive_and_distinct() {
        let mut colors: Vec<u32> = AchievementCategory::ALL.iter().map(|c| c.color()).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), AchievementCategory::ALL.len());

        let mut keys: Vec<&str> = AchievementCategory::ALL.iter().map(|c| c.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), AchievementCategory::ALL.len());
    }

    #[test]
    fn test_category_serde_round_trip() {
        let json = serde_json::to_string(&AchievementCategory::TotalScore).unwrap();
        assert_eq!(json, "\"totalScore\"");
        let back: AchievementCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AchievementCategory::TotalScore);
    }
}
