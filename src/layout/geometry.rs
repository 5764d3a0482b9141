//! Pure path geometry
//!
//! Total functions over ordered point lists. Degenerate inputs never fail:
//! 0- and 1-point paths report zero length and return their sole point
//! (or the origin for empty input) for any percentage query, and
//! percentages are clamped to [0, 1] rather than extrapolated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::quadratic_point;

/// Total polyline length; 0 for paths with fewer than 2 points
pub fn path_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Arc-length parameterized point along a polyline.
///
/// `pct = 0` returns the first point, `pct = 1` the last. Out-of-range
/// percentages clamp.
pub fn point_at_percentage(points: &[Vec2], pct: f32) -> Vec2 {
    match points {
        [] => return Vec2::ZERO,
        [only] => return *only,
        _ => {}
    }

    let pct = pct.clamp(0.0, 1.0);
    let total = path_length(points);
    if total <= f32::EPSILON {
        return points[0];
    }

    let target = total * pct;
    let mut walked = 0.0;
    for w in points.windows(2) {
        let seg = w[0].distance(w[1]);
        if walked + seg >= target {
            let t = if seg <= f32::EPSILON {
                0.0
            } else {
                (target - walked) / seg
            };
            return w[0].lerp(w[1], t);
        }
        walked += seg;
    }
    points[points.len() - 1]
}

/// Slice a polyline between two percentages (both clamped).
///
/// Endpoints are interpolated; interior vertices inside the span are kept.
/// An inverted or zero-width span collapses to a single point.
pub fn sub_path(points: &[Vec2], start_pct: f32, end_pct: f32) -> Vec<Vec2> {
    match points {
        [] => return Vec::new(),
        [only] => return vec![*only],
        _ => {}
    }

    let start_pct = start_pct.clamp(0.0, 1.0);
    let end_pct = end_pct.clamp(0.0, 1.0);
    if end_pct <= start_pct {
        return vec![point_at_percentage(points, start_pct)];
    }

    let total = path_length(points);
    if total <= f32::EPSILON {
        return vec![points[0]];
    }
    let start_len = total * start_pct;
    let end_len = total * end_pct;

    let mut out = vec![point_at_percentage(points, start_pct)];
    let mut walked = 0.0;
    for w in points.windows(2) {
        walked += w[0].distance(w[1]);
        if walked > start_len && walked < end_len {
            out.push(w[1]);
        }
    }
    out.push(point_at_percentage(points, end_pct));
    out
}

/// Flatten a control polyline into a smooth sampled curve.
///
/// Quadratic interpolation through consecutive midpoints, degrading to
/// straight spans at the path ends. Fewer than 3 control points pass
/// through unchanged.
pub fn smooth_path(control: &[Vec2], samples_per_span: usize) -> Vec<Vec2> {
    if control.len() < 3 {
        return control.to_vec();
    }
    let samples = samples_per_span.max(1);

    let mut out = Vec::with_capacity((control.len() - 1) * samples + 2);
    out.push(control[0]);
    let mut cursor = control[0];
    for i in 1..control.len() - 1 {
        let mid = (control[i] + control[i + 1]) * 0.5;
        for s in 1..=samples {
            let t = s as f32 / samples as f32;
            out.push(quadratic_point(cursor, control[i], mid, t));
        }
        cursor = mid;
    }
    out.push(control[control.len() - 1]);
    out
}

/// Axis-aligned rectangle in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from two corners (normalized so `min <= max` per axis)
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of a point set; the default (empty) rect for no points
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut iter = points.iter();
        let Some(&first) = iter.next() else {
            return Self::default();
        };
        let mut rect = Self {
            min: first,
            max: first,
        };
        for &p in iter {
            rect.min = rect.min.min(p);
            rect.max = rect.max.max(p);
        }
        rect
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow (or shrink, for negative margins) by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
