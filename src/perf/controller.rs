//! Adaptive performance controller
//!
//! Hysteresis-based quality state machine driven by frame-time samples,
//! plus viewport culling for segments, nodes, and particles. Everything is
//! synchronous and single-threaded: the host calls `record_frame` every
//! frame and `tick(dt)` from its scheduler; there are no timers or locks
//! in here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CULL_MARGIN, DEGRADE_STREAK, MIN_SAMPLES_FOR_SCORE, OPTIMIZER_INTERVAL_S, RECOVER_STREAK,
    SCORE_GOOD, SCORE_POOR,
};
use crate::layout::engine::{NodePosition, PathSegment};
use crate::layout::geometry::Rect;
use crate::perf::quality::{QualityLevel, RenderSettings};
use crate::perf::sample::FrameHistory;

/// Snapshot of the controller's quality state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityState {
    pub particle_quality: QualityLevel,
    pub graphics_quality: QualityLevel,
    pub effects_reduced: bool,
    pub quality_scale: f32,
}

impl Default for QualityState {
    fn default() -> Self {
        Self {
            particle_quality: QualityLevel::High,
            graphics_quality: QualityLevel::High,
            effects_reduced: false,
            quality_scale: 1.0,
        }
    }
}

type QualityCallback = Box<dyn FnMut(QualityLevel)>;
type FlagCallback = Box<dyn FnMut(bool)>;
type ScaleCallback = Box<dyn FnMut(f32)>;

/// Adaptive quality controller and culling oracle.
///
/// Owns the viewport rectangle and quality state; the renderer and layout
/// engine only read derived values.
pub struct PerformanceController {
    history: FrameHistory,
    state: QualityState,
    viewport: Rect,
    culling_enabled: bool,
    optimizer_running: bool,
    disposed: bool,
    eval_accum_s: f32,
    poor_streak: u32,
    good_streak: u32,
    on_particle_quality: Option<QualityCallback>,
    on_graphics_quality: Option<QualityCallback>,
    on_effects_reduced: Option<FlagCallback>,
    on_quality_scale: Option<ScaleCallback>,
}

impl Default for PerformanceController {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceController {
    pub fn new() -> Self {
        Self {
            history: FrameHistory::default(),
            state: QualityState::default(),
            viewport: Rect::default(),
            culling_enabled: true,
            optimizer_running: false,
            disposed: false,
            eval_accum_s: 0.0,
            poor_streak: 0,
            good_streak: 0,
            on_particle_quality: None,
            on_graphics_quality: None,
            on_effects_reduced: None,
            on_quality_scale: None,
        }
    }

    // --- frame sampling ---

    /// Record one frame duration in milliseconds. O(1) amortized.
    pub fn record_frame(&mut self, duration_ms: f32) {
        if self.disposed {
            return;
        }
        self.history.record(duration_ms);
    }

    pub fn average_frame_ms(&self) -> f32 {
        self.history.average_frame_ms()
    }

    pub fn fps(&self) -> f32 {
        self.history.fps()
    }

    pub fn performance_score(&self) -> f32 {
        self.history.performance_score()
    }

    // --- optimizer ---

    /// Start the debounced optimizer loop. Idempotent.
    pub fn start_optimizer(&mut self) {
        if self.disposed || self.optimizer_running {
            return;
        }
        self.optimizer_running = true;
        self.eval_accum_s = 0.0;
        self.poor_streak = 0;
        self.good_streak = 0;
    }

    /// Stop the optimizer; quality freezes until restarted. Idempotent.
    pub fn stop_optimizer(&mut self) {
        self.optimizer_running = false;
    }

    pub fn is_optimizer_running(&self) -> bool {
        self.optimizer_running
    }

    /// Advance the optimizer by `dt` seconds of host time. Runs one
    /// evaluation per elapsed interval while the optimizer is started.
    pub fn tick(&mut self, dt: f32) {
        if self.disposed || !self.optimizer_running || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.eval_accum_s += dt;
        while self.eval_accum_s >= OPTIMIZER_INTERVAL_S {
            self.eval_accum_s -= OPTIMIZER_INTERVAL_S;
            self.evaluate();
        }
    }

    /// One debounced evaluation: sustained poor scores step quality down,
    /// sustained good scores step it back up. The streak requirements are
    /// the hysteresis that prevents tier flapping.
    fn evaluate(&mut self) {
        if self.history.len() < MIN_SAMPLES_FOR_SCORE {
            return;
        }
        let score = self.history.performance_score();
        if score <= SCORE_POOR {
            self.poor_streak += 1;
            self.good_streak = 0;
            if self.poor_streak >= DEGRADE_STREAK {
                self.poor_streak = 0;
                self.degrade();
            }
        } else if score >= SCORE_GOOD {
            self.good_streak += 1;
            self.poor_streak = 0;
            if self.good_streak >= RECOVER_STREAK {
                self.good_streak = 0;
                self.recover();
            }
        } else {
            // Middling score: no transition, streaks restart
            self.poor_streak = 0;
            self.good_streak = 0;
        }
    }

    fn degrade(&mut self) {
        let graphics = self.state.graphics_quality.step_down();
        let next = QualityState {
            particle_quality: self.state.particle_quality.step_down(),
            graphics_quality: graphics,
            effects_reduced: graphics <= QualityLevel::Medium,
            quality_scale: graphics.render_scale(),
        };
        self.apply(next);
    }

    fn recover(&mut self) {
        let graphics = self.state.graphics_quality.step_up();
        let next = QualityState {
            particle_quality: self.state.particle_quality.step_up(),
            graphics_quality: graphics,
            effects_reduced: graphics <= QualityLevel::Medium,
            quality_scale: graphics.render_scale(),
        };
        self.apply(next);
    }

    /// Explicit override from settings UI or tests. Bypasses the optimizer
    /// debounce but fires the same change callbacks.
    pub fn force_quality_adjustment(
        &mut self,
        particle_quality: QualityLevel,
        graphics_quality: QualityLevel,
        effects_reduced: bool,
        quality_scale: f32,
    ) {
        if self.disposed {
            return;
        }
        self.poor_streak = 0;
        self.good_streak = 0;
        self.apply(QualityState {
            particle_quality,
            graphics_quality,
            effects_reduced,
            quality_scale: quality_scale.clamp(0.0, 1.0),
        });
    }

    /// Commit a new state, firing each callback exactly once per field
    /// that actually changed
    fn apply(&mut self, next: QualityState) {
        if next.particle_quality != self.state.particle_quality {
            self.state.particle_quality = next.particle_quality;
            log::info!("particle quality -> {}", next.particle_quality.label());
            if let Some(cb) = self.on_particle_quality.as_mut() {
                cb(next.particle_quality);
            }
        }
        if next.graphics_quality != self.state.graphics_quality {
            self.state.graphics_quality = next.graphics_quality;
            log::info!("graphics quality -> {}", next.graphics_quality.label());
            if let Some(cb) = self.on_graphics_quality.as_mut() {
                cb(next.graphics_quality);
            }
        }
        if next.effects_reduced != self.state.effects_reduced {
            self.state.effects_reduced = next.effects_reduced;
            log::info!("effects reduced -> {}", next.effects_reduced);
            if let Some(cb) = self.on_effects_reduced.as_mut() {
                cb(next.effects_reduced);
            }
        }
        if (next.quality_scale - self.state.quality_scale).abs() > f32::EPSILON {
            self.state.quality_scale = next.quality_scale;
            if let Some(cb) = self.on_quality_scale.as_mut() {
                cb(next.quality_scale);
            }
        }
    }

    // --- callbacks (one consumer per slot) ---

    pub fn on_particle_quality_changed(&mut self, cb: impl FnMut(QualityLevel) + 'static) {
        self.on_particle_quality = Some(Box::new(cb));
    }

    pub fn on_graphics_quality_changed(&mut self, cb: impl FnMut(QualityLevel) + 'static) {
        self.on_graphics_quality = Some(Box::new(cb));
    }

    pub fn on_effects_reduced_changed(&mut self, cb: impl FnMut(bool) + 'static) {
        self.on_effects_reduced = Some(Box::new(cb));
    }

    pub fn on_quality_scale_changed(&mut self, cb: impl FnMut(f32) + 'static) {
        self.on_quality_scale = Some(Box::new(cb));
    }

    // --- state accessors ---

    pub fn quality_state(&self) -> QualityState {
        self.state
    }

    pub fn particle_quality(&self) -> QualityLevel {
        self.state.particle_quality
    }

    pub fn graphics_quality(&self) -> QualityLevel {
        self.state.graphics_quality
    }

    pub fn effects_reduced(&self) -> bool {
        self.state.effects_reduced
    }

    pub fn quality_scale(&self) -> f32 {
        self.state.quality_scale
    }

    /// Particle budget for the current particle tier
    pub fn max_particles(&self) -> usize {
        self.state.particle_quality.max_particles()
    }

    /// Per-frame render contract. A pure projection of the quality state.
    pub fn optimized_render_settings(&self) -> RenderSettings {
        RenderSettings {
            glow_enabled: !self.state.effects_reduced
                && self.state.graphics_quality >= QualityLevel::Medium,
            glow_intensity: self.state.quality_scale,
            anti_aliasing: self.state.graphics_quality >= QualityLevel::High,
            quality_scale: self.state.quality_scale,
            batch_draw_calls: self.state.particle_quality <= QualityLevel::Medium,
        }
    }

    // --- viewport culling ---

    /// Store the currently visible rectangle in content coordinates
    pub fn update_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_culling_enabled(&mut self, enabled: bool) {
        self.culling_enabled = enabled;
    }

    pub fn is_culling_enabled(&self) -> bool {
        self.culling_enabled
    }

    /// True when the point is inside the viewport inflated by the cull
    /// margin, or culling is disabled. O(1).
    pub fn is_point_visible(&self, point: Vec2) -> bool {
        !self.culling_enabled || self.viewport.inflate(CULL_MARGIN).contains_point(point)
    }

    /// True when the segment's bounds intersect the inflated viewport, or
    /// culling is disabled. O(segment length).
    pub fn is_segment_visible(&self, segment: &PathSegment) -> bool {
        !self.culling_enabled
            || self
                .viewport
                .inflate(CULL_MARGIN)
                .intersects(&segment.bounds())
    }

    pub fn is_node_visible(&self, node: &NodePosition) -> bool {
        self.is_point_visible(node.position)
    }

    /// Culled subset of segments for the render pass
    pub fn visible_segments<'a>(&self, segments: &'a [PathSegment]) -> Vec<&'a PathSegment> {
        segments
            .iter()
            .filter(|s| self.is_segment_visible(s))
            .collect()
    }

    /// Culled subset of nodes for the render pass
    pub fn visible_nodes<'a, I>(&self, nodes: I) -> Vec<&'a NodePosition>
    where
        I: IntoIterator<Item = &'a NodePosition>,
    {
        nodes
            .into_iter()
            .filter(|n| self.is_node_visible(n))
            .collect()
    }

    /// Indices of visible particles; the caller keeps colors parallel
    pub fn visible_particle_indices(&self, positions: &[Vec2]) -> Vec<usize> {
        positions
            .iter()
            .enumerate()
            .filter(|(_, p)| self.is_point_visible(**p))
            .map(|(i, _)| i)
            .collect()
    }

    // --- lifecycle ---

    /// Stop the optimizer and drop all callbacks so none fire afterwards.
    /// Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop_optimizer();
        self.on_particle_quality = None;
        self.on_graphics_quality = None;
        self.on_effects_reduced = None;
        self.on_quality_scale = None;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::achievement::AchievementCategory;
    use crate::consts::FRAME_HISTORY_LEN;

    fn segment_at(x: f32, y: f32) -> PathSegment {
        PathSegment {
            id: "seg".into(),
            category: AchievementCategory::Score,
            points: vec![Vec2::new(x, y), Vec2::new(x + 100.0, y + 100.0)],
            stroke_width: 10.0,
            color: 0,
            is_main_path: false,
            completion: 0.0,
            achievement_ids: Vec::new(),
        }
    }

    fn node_at(x: f32, y: f32) -> NodePosition {
        NodePosition {
            achievement_id: "node".into(),
            position: Vec2::new(x, y),
            category: AchievementCategory::Score,
            visual_state: crate::achievement::NodeVisualState::Locked,
            path_progress: 0.5,
            is_on_main_path: false,
        }
    }

    /// Fill the whole history window with a fixed duration
    fn saturate_frames(c: &mut PerformanceController, ms: f32) {
        for _ in 0..FRAME_HISTORY_LEN {
            c.record_frame(ms);
        }
    }

    #[test]
    fn test_initial_state() {
        let c = PerformanceController::new();
        let s = c.quality_state();
        assert_eq!(s.particle_quality, QualityLevel::High);
        assert_eq!(s.graphics_quality, QualityLevel::High);
        assert!(!s.effects_reduced);
        assert_eq!(s.quality_scale, 1.0);
        assert_eq!(c.max_particles(), 150);
    }

    #[test]
    fn test_sustained_slow_frames_degrade_quality() {
        let mut c = PerformanceController::new();
        c.start_optimizer();
        saturate_frames(&mut c, 50.0); // 20fps

        for _ in 0..12 {
            c.tick(0.5);
        }

        assert!(c.graphics_quality() <= QualityLevel::Medium);
        assert!(c.particle_quality() <= QualityLevel::Medium);
        assert!(c.effects_reduced());
        assert!(c.quality_scale() < 1.0);
    }

    #[test]
    fn test_recovery_after_good_frames() {
        let mut c = PerformanceController::new();
        c.start_optimizer();
        saturate_frames(&mut c, 50.0);
        for _ in 0..12 {
            c.tick(0.5);
        }
        assert_eq!(c.graphics_quality(), QualityLevel::Low);

        // The fast frames displace the whole slow window
        saturate_frames(&mut c, 12.0); // ~83fps
        for _ in 0..8 {
            c.tick(0.5);
        }

        assert!(c.graphics_quality() >= QualityLevel::Medium);
    }

    #[test]
    fn test_middling_scores_do_not_flap() {
        let mut c = PerformanceController::new();
        c.start_optimizer();
        // ~0.55 score: between the poor and good breakpoints
        saturate_frames(&mut c, 30.0);
        for _ in 0..40 {
            c.tick(0.5);
        }
        assert_eq!(c.graphics_quality(), QualityLevel::High);
        assert_eq!(c.particle_quality(), QualityLevel::High);
    }

    #[test]
    fn test_no_transitions_before_debounce_window() {
        let mut c = PerformanceController::new();
        c.start_optimizer();
        saturate_frames(&mut c, 50.0);
        // Fewer evaluations than the degrade streak requires
        c.tick(0.5);
        c.tick(0.5);
        assert_eq!(c.graphics_quality(), QualityLevel::High);
    }

    #[test]
    fn test_stopped_optimizer_freezes_quality() {
        let mut c = PerformanceController::new();
        saturate_frames(&mut c, 50.0);
        // Never started: ticks do nothing
        for _ in 0..20 {
            c.tick(0.5);
        }
        assert_eq!(c.graphics_quality(), QualityLevel::High);

        c.start_optimizer();
        c.start_optimizer(); // idempotent
        c.stop_optimizer();
        c.stop_optimizer(); // idempotent
        for _ in 0..20 {
            c.tick(0.5);
        }
        assert_eq!(c.graphics_quality(), QualityLevel::High);
    }

    #[test]
    fn test_force_adjustment_fires_callbacks_once() {
        let mut c = PerformanceController::new();
        let particle_fires = Rc::new(RefCell::new(0));
        let graphics_fires = Rc::new(RefCell::new(0));
        let effects_fires = Rc::new(RefCell::new(0));
        let scale_fires = Rc::new(RefCell::new(0));

        let p = particle_fires.clone();
        c.on_particle_quality_changed(move |_| *p.borrow_mut() += 1);
        let g = graphics_fires.clone();
        c.on_graphics_quality_changed(move |_| *g.borrow_mut() += 1);
        let e = effects_fires.clone();
        c.on_effects_reduced_changed(move |_| *e.borrow_mut() += 1);
        let s = scale_fires.clone();
        c.on_quality_scale_changed(move |_| *s.borrow_mut() += 1);

        c.force_quality_adjustment(QualityLevel::Low, QualityLevel::Medium, true, 0.75);
        assert_eq!(*particle_fires.borrow(), 1);
        assert_eq!(*graphics_fires.borrow(), 1);
        assert_eq!(*effects_fires.borrow(), 1);
        assert_eq!(*scale_fires.borrow(), 1);

        // Re-forcing identical values is a no-op
        c.force_quality_adjustment(QualityLevel::Low, QualityLevel::Medium, true, 0.75);
        assert_eq!(*particle_fires.borrow(), 1);
        assert_eq!(*graphics_fires.borrow(), 1);
        assert_eq!(*effects_fires.borrow(), 1);
        assert_eq!(*scale_fires.borrow(), 1);

        // Changing a single field fires only that slot
        c.force_quality_adjustment(QualityLevel::Medium, QualityLevel::Medium, true, 0.75);
        assert_eq!(*particle_fires.borrow(), 2);
        assert_eq!(*graphics_fires.borrow(), 1);
    }

    #[test]
    fn test_optimizer_transitions_fire_callbacks() {
        let mut c = PerformanceController::new();
        let fires = Rc::new(RefCell::new(Vec::new()));
        let f = fires.clone();
        c.on_graphics_quality_changed(move |q| f.borrow_mut().push(q));

        c.start_optimizer();
        saturate_frames(&mut c, 50.0);
        for _ in 0..6 {
            c.tick(0.5);
        }
        assert_eq!(
            *fires.borrow(),
            vec![QualityLevel::Medium, QualityLevel::Low]
        );
    }

    #[test]
    fn test_culling_queries() {
        let mut c = PerformanceController::new();
        c.update_viewport(Rect::new(Vec2::ZERO, Vec2::new(400.0, 800.0)));

        let near = segment_at(380.0, 100.0); // bounds overlap the margin
        let far = segment_at(2000.0, 2000.0);
        assert!(c.is_segment_visible(&near));
        assert!(!c.is_segment_visible(&far));

        assert!(c.is_node_visible(&node_at(200.0, 400.0)));
        // Inside the 50-unit buffer but outside the raw viewport
        assert!(c.is_node_visible(&node_at(430.0, 400.0)));
        assert!(!c.is_node_visible(&node_at(500.0, 400.0)));

        // Disabling culling makes everything visible
        c.set_culling_enabled(false);
        assert!(c.is_segment_visible(&far));
        assert!(c.is_node_visible(&node_at(5000.0, 5000.0)));
    }

    #[test]
    fn test_visible_subset_filters() {
        let mut c = PerformanceController::new();
        c.update_viewport(Rect::new(Vec2::ZERO, Vec2::new(400.0, 400.0)));

        let segments = vec![segment_at(0.0, 0.0), segment_at(3000.0, 3000.0)];
        assert_eq!(c.visible_segments(&segments).len(), 1);

        let nodes = vec![node_at(10.0, 10.0), node_at(900.0, 900.0)];
        assert_eq!(c.visible_nodes(nodes.iter()).len(), 1);

        let particles = vec![
            Vec2::new(50.0, 50.0),
            Vec2::new(440.0, 200.0),
            Vec2::new(1000.0, 1000.0),
        ];
        assert_eq!(c.visible_particle_indices(&particles), vec![0, 1]);
    }

    #[test]
    fn test_render_settings_projection() {
        let mut c = PerformanceController::new();
        let settings = c.optimized_render_settings();
        assert!(settings.glow_enabled);
        assert!(settings.anti_aliasing);
        assert_eq!(settings.quality_scale, 1.0);
        assert!(!settings.batch_draw_calls);

        c.force_quality_adjustment(QualityLevel::Low, QualityLevel::Low, true, 0.5);
        let settings = c.optimized_render_settings();
        assert!(!settings.glow_enabled);
        assert!(!settings.anti_aliasing);
        assert_eq!(settings.glow_intensity, 0.5);
        assert!(settings.batch_draw_calls);
    }

    #[test]
    fn test_dispose_is_idempotent_and_silences_callbacks() {
        let mut c = PerformanceController::new();
        let fires = Rc::new(RefCell::new(0));
        let f = fires.clone();
        c.on_graphics_quality_changed(move |_| *f.borrow_mut() += 1);

        c.start_optimizer();
        c.dispose();
        c.dispose(); // idempotent
        assert!(c.is_disposed());
        assert!(!c.is_optimizer_running());

        saturate_frames(&mut c, 50.0);
        for _ in 0..12 {
            c.tick(0.5);
        }
        c.force_quality_adjustment(QualityLevel::Low, QualityLevel::Low, true, 0.5);
        assert_eq!(*fires.borrow(), 0);
        // State frozen too
        assert_eq!(c.graphics_quality(), QualityLevel::High);
    }
}
