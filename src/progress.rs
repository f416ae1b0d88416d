//! Cleaning progress and the one-shot completion trigger.

use crate::constants::PROGRESS_NOTIFY_STEP;
use crate::coverage::CoverageMap;

/// Thin read-only view over the coverage ratio.
pub struct ProgressSystem;

impl ProgressSystem {
    pub fn progress(coverage: &CoverageMap) -> f32 {
        coverage.progress()
    }
}

/// Edge-triggered completion latch plus progress-change throttling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionTracker {
    threshold: f32,
    completed: bool,
    last_notified: f32,
}

/// Result of feeding one progress sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressEdges {
    /// Progress first reached the threshold on this sample.
    pub completed_now: bool,
    /// Progress moved by more than [`PROGRESS_NOTIFY_STEP`] since the last
    /// notification.
    pub changed: bool,
}

impl CompletionTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            completed: false,
            last_notified: 0.0,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether completion has fired this session.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn observe(&mut self, progress: f32) -> ProgressEdges {
        let mut edges = ProgressEdges::default();
        if (progress - self.last_notified).abs() > PROGRESS_NOTIFY_STEP {
            self.last_notified = progress;
            edges.changed = true;
        }
        if !self.completed && progress >= self.threshold {
            self.completed = true;
            edges.completed_now = true;
        }
        edges
    }

    /// Re-arm for a new session.
    pub fn reset(&mut self) {
        self.completed = false;
        self.last_notified = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_fires_once() {
        let mut t = CompletionTracker::new(0.95);
        assert!(!t.observe(0.5).completed_now);
        assert!(t.observe(0.96).completed_now);
        assert!(!t.observe(0.97).completed_now);
        assert!(!t.observe(1.0).completed_now);
        assert!(t.is_completed());
    }

    #[test]
    fn reset_rearms_completion() {
        let mut t = CompletionTracker::new(0.95);
        t.observe(0.99);
        t.reset();
        assert!(!t.is_completed());
        assert!(t.observe(0.99).completed_now);
    }

    #[test]
    fn small_changes_are_throttled() {
        let mut t = CompletionTracker::new(0.95);
        assert!(!t.observe(0.005).changed);
        assert!(t.observe(0.02).changed);
        assert!(!t.observe(0.025).changed);
        assert!(t.observe(0.031).changed);
    }
}
