//! Responsive path layout
//!
//! Deterministic placement of achievement nodes along a main path and
//! per-category branches:
//! - `geometry`: pure polyline math and the `Rect` culling primitive
//! - `config`: responsive configuration from screen size and density
//! - `branching`: per-category branch priorities, angles, and paths
//! - `engine`: the layout pass producing segments and node positions

pub mod branching;
pub mod config;
pub mod engine;
pub mod geometry;

pub use branching::{
    BranchConfig, branch_config, calculate_branch_path, categories_by_priority, main_category,
    responsive_branch_config,
};
pub use config::{Orientation, PathLayoutConfig, SizeCategory};
pub use engine::{NodePosition, PathLayout, PathLayoutEngine, PathSegment};
pub use geometry::{Rect, path_length, point_at_percentage, smooth_path, sub_path};
