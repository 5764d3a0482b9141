//! Path layout engine
//!
//! Turns an achievement list plus a resolved config into the full segment
//! set and per-achievement node positions. The pass is deterministic:
//! buckets iterate in branch-priority order, achievements in id order, and
//! nothing depends on map iteration order. Layout runs once per
//! invalidating event (resize, achievement-set change), never per frame.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::achievement::{Achievement, AchievementCategory, NodeVisualState};
use crate::consts::CURVE_SAMPLES_PER_SPAN;
use crate::layout::branching;
use crate::layout::config::PathLayoutConfig;
use crate::layout::geometry::{self, Rect};

/// A renderable path segment: the main path or one category branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,
    pub category: AchievementCategory,
    /// Ordered polyline, always at least 1 point
    pub points: Vec<Vec2>,
    pub stroke_width: f32,
    /// Packed 0xRRGGBBAA stroke color
    pub color: u32,
    pub is_main_path: bool,
    /// Unlocked fraction of the anchored achievements, in [0, 1]
    pub completion: f32,
    /// Achievements anchored to this segment, in placement order
    pub achievement_ids: Vec<String>,
}

impl PathSegment {
    /// Arc length; exactly 0 for 0- and 1-point segments
    pub fn length(&self) -> f32 {
        geometry::path_length(&self.points)
    }

    /// Arc-length parameterized point; percentage clamps to [0, 1]
    pub fn point_at(&self, pct: f32) -> Vec2 {
        geometry::point_at_percentage(&self.points, pct)
    }

    /// Slice of the segment between two percentages, for the
    /// completed-glow vs base-dim rendering split
    pub fn slice(&self, start_pct: f32, end_pct: f32) -> Vec<Vec2> {
        geometry::sub_path(&self.points, start_pct, end_pct)
    }

    /// Bounding box of the polyline, used for viewport culling
    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.points)
    }
}

/// Resolved placement of one achievement node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePosition {
    pub achievement_id: String,
    pub position: Vec2,
    pub category: AchievementCategory,
    pub visual_state: NodeVisualState,
    /// Fractional position along the owning segment, in [0, 1]
    pub path_progress: f32,
    pub is_on_main_path: bool,
}

/// Complete output of one layout pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathLayout {
    /// Main path first, then branches in priority order
    pub segments: Vec<PathSegment>,
    /// Node positions keyed by achievement id
    pub nodes: HashMap<String, NodePosition>,
}

impl PathLayout {
    /// Content bounds covering every segment, for scroll-extent sizing
    pub fn content_bounds(&self) -> Rect {
        let mut bounds: Option<Rect> = None;
        for segment in &self.segments {
            let b = segment.bounds();
            bounds = Some(match bounds {
                None => b,
                Some(acc) => Rect::new(acc.min.min(b.min), acc.max.max(b.max)),
            });
        }
        bounds.unwrap_or_default()
    }
}

/// Layout engine bound to one resolved config
#[derive(Debug, Clone)]
pub struct PathLayoutEngine {
    config: PathLayoutConfig,
}

impl PathLayoutEngine {
    pub fn new(config: PathLayoutConfig) -> Self {
        Self { config }
    }

    /// Resolve the config from a raw screen size
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self::new(PathLayoutConfig::resolve(width, height))
    }

    pub fn for_screen_with_density(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self::new(PathLayoutConfig::resolve_with_density(
            width,
            height,
            device_pixel_ratio,
        ))
    }

    pub fn config(&self) -> &PathLayoutConfig {
        &self.config
    }

    /// Run a full layout pass.
    ///
    /// Empty input produces empty output; a single achievement produces one
    /// segment and one node. Identical inputs produce identical geometry.
    pub fn layout(&self, achievements: &[Achievement]) -> PathLayout {
        let mut result = PathLayout::default();
        if achievements.is_empty() {
            return result;
        }

        let config = &self.config;
        let node_radius = config.node_size * 0.5;

        // Partition by category in priority order, id-sorted within each
        // bucket, so output never depends on input or map ordering
        let ordered = branching::categories_by_priority();
        let mut buckets: Vec<(AchievementCategory, Vec<&Achievement>)> = ordered
            .iter()
            .map(|&category| {
                let mut bucket: Vec<&Achievement> = achievements
                    .iter()
                    .filter(|a| a.category == category)
                    .collect();
                bucket.sort_by(|a, b| a.id.cmp(&b.id));
                (category, bucket)
            })
            .collect();
        let (main_category, main_bucket) = buckets.remove(0);

        let vertical = branching::main_axis(config.orientation) == Vec2::Y;
        let effective = config.effective_size();
        let pad = config.screen_padding;
        let (screen_long, short_extent) = if vertical {
            (effective.y, effective.x)
        } else {
            (effective.x, effective.y)
        };

        // The scroll extent grows past the screen when the main bucket
        // needs more room at minimum spacing
        let needed = main_bucket.len().saturating_sub(1) as f32 * config.min_node_spacing * 1.1;
        let long_extent = screen_long.max(needed);

        let content_rect = if vertical {
            Rect::new(
                Vec2::new(pad, pad),
                Vec2::new(pad + short_extent, pad + long_extent),
            )
        } else {
            Rect::new(
                Vec2::new(pad, pad),
                Vec2::new(pad + long_extent, pad + short_extent),
            )
        };
        let node_rect = shrink(content_rect, node_radius);

        let main_points = self.main_path_points(long_extent, short_extent, vertical);
        let main_segment = self.build_segment(
            format!("path_{}", main_category.key()),
            main_category,
            main_points,
            true,
            &main_bucket,
        );
        self.place_nodes(&main_segment, &main_bucket, node_rect, &mut result.nodes);

        // Branches, in priority order, anchored evenly along the main path
        let branch_count = buckets.iter().filter(|(_, b)| !b.is_empty()).count();
        let mut occupied_ends: Vec<Vec2> = Vec::new();
        let mut branch_index = 0usize;
        let mut branch_segments = Vec::new();
        for (category, bucket) in &buckets {
            if bucket.is_empty() {
                continue;
            }
            branch_index += 1;
            let anchor_pct = branch_index as f32 / (branch_count + 1) as f32;
            let anchor = main_segment.point_at(anchor_pct);

            let mut points = branching::calculate_branch_path(anchor, *category, config);

            // Stretch to host this bucket at minimum spacing
            let needed = bucket.len().saturating_sub(1) as f32 * config.min_node_spacing * 1.1;
            let current = geometry::path_length(&points);
            if current > f32::EPSILON && current < needed {
                stretch_from(&mut points, anchor, needed / current);
            }

            // Keep branch ends at least one node diameter apart
            let mut tries = 0;
            while tries < 5 && end_too_close(&points, &occupied_ends, config.node_size) {
                stretch_from(&mut points, anchor, 1.2);
                tries += 1;
            }

            // Aesthetic clamp: strokes stay inside the content rect
            for p in &mut points {
                *p = p.clamp(content_rect.min, content_rect.max);
            }

            // Clamping can shorten the arc below what the bucket needs at
            // minimum spacing. If it did, re-route: walk the full arc from
            // the anchor, reflecting off the content rect walls, so the
            // branch winds instead of shrinking.
            if needed > 0.0 && geometry::path_length(&points) + 1e-3 < needed {
                let dir = branching::branch_direction(*category, config);
                points = route_in_rect(
                    anchor,
                    dir,
                    needed,
                    content_rect,
                    config.min_node_spacing * 0.5,
                );
            }

            if let Some(&end) = points.last() {
                occupied_ends.push(end);
            }

            let segment = self.build_segment(
                format!("branch_{}", category.key()),
                *category,
                points,
                false,
                bucket,
            );
            self.place_nodes(&segment, bucket, node_rect, &mut result.nodes);
            branch_segments.push(segment);
        }

        result.segments.push(main_segment);
        result.segments.extend(branch_segments);

        log::debug!(
            "layout pass: {} achievements -> {} segments, {} nodes ({:?}, {:?})",
            achievements.len(),
            result.segments.len(),
            result.nodes.len(),
            config.size_category,
            config.orientation,
        );

        result
    }

    /// Smooth main-path curve along the long content axis
    fn main_path_points(&self, long_extent: f32, short_extent: f32, vertical: bool) -> Vec<Vec2> {
        let config = &self.config;
        let pad = config.screen_padding;
        let lateral_center = pad + short_extent * 0.5;

        // Lateral wave amplitude, capped so the curve plus a node stays in
        // the content rect
        let amplitude = (config.curvature * short_extent * 0.3)
            .min((short_extent * 0.5 - config.node_size).max(0.0));

        let spans = ((long_extent / 160.0).ceil() as usize).clamp(2, 24);
        let waves = if config.compact_mode { 0.75 } else { 1.25 };

        let mut control = Vec::with_capacity(spans + 1);
        for i in 0..=spans {
            let t = i as f32 / spans as f32;
            let along = pad + t * long_extent;
            let lateral = lateral_center + amplitude * (t * waves * std::f32::consts::TAU).sin();
            control.push(if vertical {
                Vec2::new(lateral, along)
            } else {
                Vec2::new(along, lateral)
            });
        }
        geometry::smooth_path(&control, CURVE_SAMPLES_PER_SPAN)
    }

    fn build_segment(
        &self,
        id: String,
        category: AchievementCategory,
        points: Vec<Vec2>,
        is_main_path: bool,
        bucket: &[&Achievement],
    ) -> PathSegment {
        let unlocked = bucket.iter().filter(|a| a.unlocked).count();
        let completion = if bucket.is_empty() {
            0.0
        } else {
            unlocked as f32 / bucket.len() as f32
        };
        let stroke_width = self.config.node_size * if is_main_path { 0.32 } else { 0.22 };
        PathSegment {
            id,
            category,
            points,
            stroke_width,
            color: category.color(),
            is_main_path,
            completion,
            achievement_ids: bucket.iter().map(|a| a.id.clone()).collect(),
        }
    }

    /// Place a bucket's nodes at evenly spaced progress values and clamp
    /// their centers into the node rect
    fn place_nodes(
        &self,
        segment: &PathSegment,
        bucket: &[&Achievement],
        node_rect: Rect,
        nodes: &mut HashMap<String, NodePosition>,
    ) {
        let count = bucket.len();
        for (i, achievement) in bucket.iter().enumerate() {
            let path_progress = match count {
                1 => 0.5,
                _ => i as f32 / (count - 1) as f32,
            };
            let raw = segment.point_at(path_progress);
            let position = raw.clamp(node_rect.min, node_rect.max);
            nodes.insert(
                achievement.id.clone(),
                NodePosition {
                    achievement_id: achievement.id.clone(),
                    position,
                    category: achievement.category,
                    visual_state: achievement.visual_state(),
                    path_progress,
                    is_on_main_path: segment.is_main_path,
                },
            );
        }
    }
}

/// Scale every point's offset from `origin`; leaves `origin`-coincident
/// points in place
fn stretch_from(points: &mut [Vec2], origin: Vec2, factor: f32) {
    for p in points.iter_mut() {
        *p = origin + (*p - origin) * factor;
    }
}

fn end_too_close(points: &[Vec2], occupied: &[Vec2], min_dist: f32) -> bool {
    let Some(&end) = points.last() else {
        return false;
    };
    occupied.iter().any(|e| e.distance(end) < min_dist)
}

/// Walk `total_len` of arc from `start` along `dir`, reflecting off the
/// rect walls. Every point stays inside the rect and the polyline keeps
/// the full arc length, unlike a plain clamp.
fn route_in_rect(start: Vec2, dir: Vec2, total_len: f32, rect: Rect, step_len: f32) -> Vec<Vec2> {
    let step_len = step_len.max(1.0);
    let mut dir = if dir.length_squared() > f32::EPSILON {
        dir.normalize()
    } else {
        Vec2::Y
    };
    let mut pos = start.clamp(rect.min, rect.max);
    let mut points = vec![pos];
    let mut remaining = total_len;
    // Bounded in case the rect degenerates to a line or point
    for _ in 0..4096 {
        if remaining <= 1e-3 {
            break;
        }
        let step = step_len.min(remaining);
        let seg = dir * step;
        let tx = exit_fraction(pos.x, seg.x, rect.min.x, rect.max.x);
        let ty = exit_fraction(pos.y, seg.y, rect.min.y, rect.max.y);
        let t = tx.min(ty).min(1.0).max(0.0);
        if t > 0.0 {
            pos += seg * t;
            pos = pos.clamp(rect.min, rect.max);
            remaining -= step * t;
            points.push(pos);
        }
        if t < 1.0 {
            // Reflect whichever axis hit its wall
            if tx <= ty {
                dir.x = -dir.x;
            }
            if ty <= tx {
                dir.y = -dir.y;
            }
        }
    }
    points
}

/// Fraction of `delta` travelable from `x` before leaving [min, max];
/// infinite when the motion never exits
fn exit_fraction(x: f32, delta: f32, min: f32, max: f32) -> f32 {
    if delta > 0.0 {
        (max - x) / delta
    } else if delta < 0.0 {
        (min - x) / delta
    } else {
        f32::INFINITY
    }
}

/// Inset a rect on all sides, collapsing toward its center instead of
/// inverting when the inset exceeds the half-extent
fn shrink(rect: Rect, inset: f32) -> Rect {
    let inner = rect.inflate(-inset);
    Rect::new(inner.min.min(inner.max), inner.max.max(inner.min))
}
