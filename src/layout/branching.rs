//! Category branching rules
//!
//! Fixed per-category branch table: the priority-0 category owns the main
//! path, every other category extends a branch off it. Priorities induce
//! the total order used for draw order and placement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::achievement::AchievementCategory;
use crate::layout::config::{Orientation, PathLayoutConfig};

/// Per-category branch parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchConfig {
    /// 0 = main path; higher values draw later and fan farther out
    pub priority: u8,
    /// Base branch length in layout units, before responsive scaling
    pub length: f32,
    /// Fan angle relative to the main-path axis, in multiples of the
    /// config's branch angle; sign picks the side
    pub angle_offset: f32,
}

/// Fixed branch table. `Score` is the main path.
pub fn branch_config(category: AchievementCategory) -> BranchConfig {
    match category {
        AchievementCategory::Score => BranchConfig {
            priority: 0,
            length: 0.0,
            angle_offset: 0.0,
        },
        AchievementCategory::TotalScore => BranchConfig {
            priority: 1,
            length: 200.0,
            angle_offset: -1.0,
        },
        AchievementCategory::GamesPlayed => BranchConfig {
            priority: 2,
            length: 180.0,
            angle_offset: 1.0,
        },
        AchievementCategory::PulseUsage => BranchConfig {
            priority: 3,
            length: 160.0,
            angle_offset: -1.6,
        },
        AchievementCategory::PowerUps => BranchConfig {
            priority: 4,
            length: 160.0,
            angle_offset: 1.6,
        },
        AchievementCategory::Survival => BranchConfig {
            priority: 5,
            length: 140.0,
            angle_offset: -0.5,
        },
    }
}

/// The category that owns the main path (priority 0)
pub fn main_category() -> AchievementCategory {
    categories_by_priority()[0]
}

/// All categories sorted ascending by branch priority
pub fn categories_by_priority() -> [AchievementCategory; 6] {
    let mut all = AchievementCategory::ALL;
    all.sort_by_key(|c| branch_config(*c).priority);
    all
}

/// Branch config with length scaled to the resolved screen config, so the
/// same category keeps a consistent relative length across screen sizes.
pub fn responsive_branch_config(
    category: AchievementCategory,
    config: &PathLayoutConfig,
) -> BranchConfig {
    let base = branch_config(category);
    let shorter = config.effective_size().min_element();
    // 400 units is the reference layout the base lengths were tuned on
    let screen_scale = (shorter / 400.0).clamp(0.5, 2.5);
    let compact_scale = if config.compact_mode { 0.75 } else { 1.0 };
    let length = base.length * screen_scale * compact_scale * config.density_factor;
    BranchConfig { length, ..base }
}

/// Direction of the main path's long axis for the given orientation
pub(crate) fn main_axis(orientation: Orientation) -> Vec2 {
    match orientation {
        // Vertical scroll in portrait and square layouts
        Orientation::Portrait | Orientation::Square => Vec2::Y,
        Orientation::Landscape => Vec2::X,
    }
}

/// Unit direction a category's branch extends in for the resolved config
pub(crate) fn branch_direction(category: AchievementCategory, config: &PathLayoutConfig) -> Vec2 {
    let branch = branch_config(category);
    let axis = main_axis(config.orientation);
    Vec2::from_angle(axis.to_angle() + branch.angle_offset * config.branch_angle)
}

/// Build an ordered branch point list starting at `start`.
///
/// The branch extends at the category's fan angle (scaled by the config's
/// branch angle) for the responsive length, with a curvature sway that
/// vanishes at both ends. The last point is always strictly farther from
/// `start` than the first.
pub fn calculate_branch_path(
    start: Vec2,
    category: AchievementCategory,
    config: &PathLayoutConfig,
) -> Vec<Vec2> {
    let branch = responsive_branch_config(category, config);
    // Even a zero-length table entry yields a usable, non-degenerate branch
    let length = branch.length.max(config.node_size);

    let dir = branch_direction(category, config);
    let perp = dir.perp();

    const STEPS: usize = 4;
    let mut points = Vec::with_capacity(STEPS + 1);
    points.push(start);
    for i in 1..=STEPS {
        let t = i as f32 / STEPS as f32;
        let sway = config.curvature * length * 0.2 * (t * std::f32::consts::PI).sin();
        points.push(start + dir * (length * t) + perp * sway);
    }
    points
}
