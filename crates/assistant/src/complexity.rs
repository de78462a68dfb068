//! UI complexity adapter.
//!
//! Derives how much of the interface should be exposed from the learning
//! summary and recent struggle signals. It only computes the target; the
//! rendering collaborator decides what that means for widgets.

use serde::Serialize;

use crate::learning::LearningSummary;
use crate::snapshot::ContextSnapshot;

/// Coarse bucket of a complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ComplexityLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ComplexityLevel {
    pub fn from_score(score: f32) -> Self {
        match score {
            s if s < 0.25 => ComplexityLevel::Beginner,
            s if s < 0.5 => ComplexityLevel::Intermediate,
            s if s < 0.75 => ComplexityLevel::Advanced,
            _ => ComplexityLevel::Expert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityTarget {
    /// Score in `[0, 1]`.
    pub score: f32,
    pub level: ComplexityLevel,
}

impl ComplexityTarget {
    pub fn new(score: f32) -> Self {
        let score = score.clamp(0.0, 1.0);
        Self {
            score,
            level: ComplexityLevel::from_score(score),
        }
    }
}

/// Target complexity for the given state. Deterministic.
///
/// An explicit user override wins. Otherwise the skill estimate is lowered by
/// `0.05` per recent failure or undo, by at most `0.3`.
pub fn target_complexity(summary: &LearningSummary, snapshot: &ContextSnapshot) -> f32 {
    if let Some(pinned) = snapshot.preferences.complexity_override {
        return pinned.clamp(0.0, 1.0);
    }
    let struggle = (snapshot.activity.recent_errors + snapshot.activity.recent_undos) as f32;
    let penalty = (struggle * 0.05).min(0.3);
    (summary.skill_level - penalty).clamp(0.0, 1.0)
}

#[derive(Debug)]
pub struct UiComplexityAdapter {
    hysteresis: f32,
    current: Option<ComplexityTarget>,
}

impl UiComplexityAdapter {
    pub fn new(hysteresis: f32) -> Self {
        Self {
            hysteresis,
            current: None,
        }
    }

    /// Last target forwarded to the UI.
    pub fn current(&self) -> Option<ComplexityTarget> {
        self.current
    }

    /// Recompute the target. Returns it only when it moved by more than the
    /// hysteresis (or on the first call).
    pub fn adapt(
        &mut self,
        summary: &LearningSummary,
        snapshot: &ContextSnapshot,
    ) -> Option<ComplexityTarget> {
        let target = ComplexityTarget::new(target_complexity(summary, snapshot));
        let changed = match self.current {
            None => true,
            Some(current) => (current.score - target.score).abs() > self.hysteresis,
        };
        if !changed {
            return None;
        }

        tracing::debug!(score = target.score, level = %target.level, "ui complexity target changed");
        self.current = Some(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ActivitySummary;
    use crate::types::UserPreferences;

    fn summary(skill_level: f32) -> LearningSummary {
        LearningSummary {
            skill_level,
            ..Default::default()
        }
    }

    #[test]
    fn struggle_lowers_target() {
        let calm = ContextSnapshot::default();
        let struggling = ContextSnapshot {
            activity: ActivitySummary {
                recent_errors: 2,
                recent_undos: 2,
                ..Default::default()
            },
            ..Default::default()
        };

        let skilled = summary(0.8);
        assert!((target_complexity(&skilled, &calm) - 0.8).abs() < 1e-6);
        assert!((target_complexity(&skilled, &struggling) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn override_wins() {
        let snapshot = ContextSnapshot {
            preferences: UserPreferences {
                complexity_override: Some(1.4),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(target_complexity(&summary(0.1), &snapshot), 1.0);
    }

    #[test]
    fn hysteresis_suppresses_small_moves() {
        let snapshot = ContextSnapshot::default();
        let mut adapter = UiComplexityAdapter::new(0.05);

        let first = adapter.adapt(&summary(0.30), &snapshot).unwrap();
        assert_eq!(first.level, ComplexityLevel::Intermediate);
        assert!(adapter.adapt(&summary(0.33), &snapshot).is_none());

        let moved = adapter.adapt(&summary(0.80), &snapshot).unwrap();
        assert_eq!(moved.level, ComplexityLevel::Expert);
        assert_eq!(adapter.current(), Some(moved));
    }
}
