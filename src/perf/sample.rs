//! Frame-time sampling
//!
//! Bounded rolling history of frame durations. Recording is O(1)
//! amortized; the derived average, FPS, and normalized performance score
//! are O(window).

use std::collections::VecDeque;

use crate::consts::{FRAME_HISTORY_LEN, TARGET_FRAME_MS};

/// Rolling window of recent frame durations in milliseconds
#[derive(Debug, Clone)]
pub struct FrameHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new(FRAME_HISTORY_LEN)
    }
}

impl FrameHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one frame duration; the oldest sample is evicted past the
    /// window. Non-finite and non-positive durations are ignored.
    pub fn record(&mut self, duration_ms: f32) {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(duration_ms);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Average frame duration; the 60fps budget when no samples exist
    pub fn average_frame_ms(&self) -> f32 {
        if self.samples.is_empty() {
            return TARGET_FRAME_MS;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    /// Instantaneous FPS from the rolling average
    pub fn fps(&self) -> f32 {
        1000.0 / self.average_frame_ms().max(f32::EPSILON)
    }

    /// Normalized performance score in [0, 1]: 1.0 at or above the 60fps
    /// target, falling toward 0 as frames slow
    pub fn performance_score(&self) -> f32 {
        (TARGET_FRAME_MS / self.average_frame_ms().max(f32::EPSILON)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_defaults_to_target() {
        let history = FrameHistory::default();
        assert!((history.average_frame_ms() - TARGET_FRAME_MS).abs() < 1e-4);
        assert!((history.performance_score() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut history = FrameHistory::new(4);
        for ms in [100.0, 100.0, 100.0, 100.0] {
            history.record(ms);
        }
        for ms in [10.0, 10.0, 10.0, 10.0] {
            history.record(ms);
        }
        assert_eq!(history.len(), 4);
        assert!((history.average_frame_ms() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_score_brackets() {
        let mut slow = FrameHistory::default();
        for _ in 0..60 {
            slow.record(50.0); // 20fps
        }
        assert!(slow.performance_score() <= 0.4);
        assert!((slow.fps() - 20.0).abs() < 0.1);

        let mut fast = FrameHistory::default();
        for _ in 0..60 {
            fast.record(12.0); // ~83fps
        }
        assert!(fast.performance_score() >= 0.8);
    }

    #[test]
    fn test_invalid_samples_ignored() {
        let mut history = FrameHistory::default();
        history.record(f32::NAN);
        history.record(-5.0);
        history.record(0.0);
        assert!(history.is_empty());
        history.record(16.0);
        assert_eq!(history.len(), 1);
    }
}
