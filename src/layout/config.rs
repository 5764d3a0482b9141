//! Responsive layout configuration
//!
//! Resolved once per (screen size, device pixel ratio) pair and treated as
//! immutable for the duration of a layout pass. Resolution is total over
//! the input domain: every screen size, including degenerate aspect
//! ratios, produces a valid config.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_NODE_SIZE;

/// Screen orientation, classified from the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

/// Screen size class, by the shorter screen dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl SizeCategory {
    /// Classify by the shorter screen dimension
    pub fn from_shorter_dimension(dim: f32) -> Self {
        if dim < 400.0 {
            SizeCategory::Small
        } else if dim < 900.0 {
            SizeCategory::Medium
        } else if dim < 1400.0 {
            SizeCategory::Large
        } else {
            SizeCategory::ExtraLarge
        }
    }

    /// Monotonic scale factor applied to node size, spacing, and padding
    pub fn scale(&self) -> f32 {
        match self {
            SizeCategory::Small => 0.85,
            SizeCategory::Medium => 1.0,
            SizeCategory::Large => 1.2,
            SizeCategory::ExtraLarge => 1.4,
        }
    }

    /// Upper bound on nodes per visual row before wrapping
    pub fn max_nodes_per_row(&self) -> u32 {
        match self {
            SizeCategory::Small => 3,
            SizeCategory::Medium => 4,
            SizeCategory::Large => 6,
            SizeCategory::ExtraLarge => 8,
        }
    }
}

/// Resolved, immutable configuration for a single layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLayoutConfig {
    /// Raw screen size the config was resolved for
    pub screen_size: Vec2,
    pub size_category: SizeCategory,
    pub orientation: Orientation,
    /// Node touch-target diameter; never below the 44-unit floor
    pub node_size: f32,
    /// Minimum distance between node centers along a path
    pub min_node_spacing: f32,
    /// Spacing between parallel paths
    pub path_spacing: f32,
    /// Fan angle for branches off the main path (radians)
    pub branch_angle: f32,
    /// Lateral curvature of paths, 0 = straight
    pub curvature: f32,
    pub max_nodes_per_row: u32,
    /// Tighter curvature and shorter paths on small screens
    pub compact_mode: bool,
    /// Symmetric padding inset from the screen edges
    pub screen_padding: f32,
    /// Bounded device-pixel-ratio factor applied to branch lengths
    pub density_factor: f32,
}

impl PathLayoutConfig {
    /// Resolve a config for the given screen, with a default pixel ratio
    pub fn resolve(width: f32, height: f32) -> Self {
        Self::resolve_with_density(width, height, 1.0)
    }

    /// Resolve a config for the given screen and device pixel ratio
    pub fn resolve_with_density(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        // Guard degenerate dimensions so every downstream ratio is finite
        let width = width.max(1.0);
        let height = height.max(1.0);

        let aspect = width / height;
        let orientation = if aspect > 1.15 {
            Orientation::Landscape
        } else if aspect < 0.85 {
            Orientation::Portrait
        } else {
            Orientation::Square
        };

        let shorter = width.min(height);
        let size_category = SizeCategory::from_shorter_dimension(shorter);
        let scale = size_category.scale();

        let density_factor = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.clamp(0.5, 3.0)
        } else {
            1.0
        };

        // Accessibility floor: touch targets never shrink below 44 units
        let node_size = (48.0 * scale).max(MIN_NODE_SIZE);

        let compact_mode = size_category <= SizeCategory::Medium;
        let curvature = if compact_mode { 0.25 } else { 0.45 };

        let min_node_spacing = node_size * if compact_mode { 1.3 } else { 1.6 };
        let path_spacing = node_size * 2.2;

        // Branches fan wider when vertical space dominates
        let branch_angle = match orientation {
            Orientation::Portrait => 60.0_f32.to_radians(),
            Orientation::Square => 45.0_f32.to_radians(),
            Orientation::Landscape => 30.0_f32.to_radians(),
        };

        // Padding scales with category but never eats the whole screen
        let screen_padding = (20.0 * scale).min(shorter * 0.2);

        Self {
            screen_size: Vec2::new(width, height),
            size_category,
            orientation,
            node_size,
            min_node_spacing,
            path_spacing,
            branch_angle,
            curvature,
            max_nodes_per_row: size_category.max_nodes_per_row(),
            compact_mode,
            screen_padding,
            density_factor,
        }
    }

    /// Screen size minus symmetric padding, floored at 1x1
    pub fn effective_size(&self) -> Vec2 {
        (self.screen_size - Vec2::splat(self.screen_padding * 2.0)).max(Vec2::ONE)
    }
}
