//! Learning tracker.
//!
//! Owns the append-only interaction history, the milestone set and the user's
//! preferences. Other components only read from it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::{AssistantConfig, OVERALL_CATEGORY};
use crate::error::CollaboratorError;
use crate::types::{InteractionOutcome, LearningMilestone, UserInteraction, UserPreferences};

/// Number of most recent interactions handed to the model updater.
const REFRESH_WINDOW: usize = 20;

/// Derived metrics over the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LearningSummary {
    pub total_interactions: usize,
    pub answered: u32,
    /// Answered share of query interactions.
    pub success_rate: f32,
    pub distinct_categories: usize,
    /// Deterministic skill estimate in `[0, 1]`.
    pub skill_level: f32,
}

/// Everything the tracker persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningSnapshot {
    pub history: Vec<UserInteraction>,
    pub milestones: Vec<LearningMilestone>,
    pub preferences: UserPreferences,
}

/// Receives periodic "update models" calls. Fire-and-forget: the tree never
/// waits for the refresh to finish.
pub trait ModelUpdater: Send + Sync {
    fn refresh(
        &self,
        summary: &LearningSummary,
        recent: &[UserInteraction],
    ) -> Result<(), CollaboratorError>;
}

/// Model updater for hosts without learnable models.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModelUpdater;

impl ModelUpdater for NoopModelUpdater {
    fn refresh(
        &self,
        _summary: &LearningSummary,
        _recent: &[UserInteraction],
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LearningTracker {
    history: Vec<UserInteraction>,
    milestones: Vec<LearningMilestone>,
    consumed: BTreeSet<(String, u32)>,
    answered: BTreeMap<String, u32>,
    preferences: UserPreferences,
    last_refresh: Option<u64>,
}

impl LearningTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from persisted state. Restored milestones stay consumed.
    pub fn restore(snapshot: LearningSnapshot) -> Self {
        let mut tracker = Self {
            preferences: snapshot.preferences,
            ..Default::default()
        };
        for interaction in snapshot.history {
            tracker.record(interaction);
        }
        for milestone in snapshot.milestones {
            tracker
                .consumed
                .insert((milestone.category.clone(), milestone.threshold));
            tracker.milestones.push(milestone);
        }
        tracker
    }

    pub fn snapshot(&self) -> LearningSnapshot {
        LearningSnapshot {
            history: self.history.clone(),
            milestones: self.milestones.clone(),
            preferences: self.preferences.clone(),
        }
    }

    /// Append a completed interaction.
    pub fn record(&mut self, interaction: UserInteraction) {
        if interaction.outcome == InteractionOutcome::Answered {
            *self
                .answered
                .entry(interaction.category.clone())
                .or_insert(0) += 1;
        }
        tracing::debug!(
            category = %interaction.category,
            outcome = %interaction.outcome,
            "interaction recorded"
        );
        self.history.push(interaction);
    }

    /// Fire every milestone whose threshold has been reached and that has not
    /// fired before. Calling this again without new interactions returns
    /// nothing.
    pub fn detect_milestones(
        &mut self,
        tick: u64,
        config: &AssistantConfig,
    ) -> Vec<LearningMilestone> {
        let overall: u32 = self.answered.values().sum();
        let counts = self
            .answered
            .iter()
            .map(|(category, count)| (category.clone(), *count))
            .chain(std::iter::once((OVERALL_CATEGORY.to_string(), overall)))
            .collect::<Vec<_>>();

        let mut fired = Vec::new();
        for (category, count) in counts {
            for &threshold in config.milestone_thresholds_for(&category) {
                if count >= threshold && self.consumed.insert((category.clone(), threshold)) {
                    let milestone = LearningMilestone {
                        category: category.clone(),
                        threshold,
                        reached_at: tick,
                    };
                    tracing::info!(
                        category = %milestone.category,
                        threshold,
                        "learning milestone reached"
                    );
                    self.milestones.push(milestone.clone());
                    fired.push(milestone);
                }
            }
        }
        fired
    }

    pub fn summary(&self) -> LearningSummary {
        let answered: u32 = self.answered.values().sum();
        let queries = self
            .history
            .iter()
            .filter(|i| i.outcome != InteractionOutcome::Suggested)
            .count();
        let success_rate = if queries == 0 {
            0.0
        } else {
            answered as f32 / queries as f32
        };
        let distinct = self.answered.len();

        let practice = 1.0 - (-(answered as f32) / 15.0).exp();
        let breadth = distinct as f32 / (distinct as f32 + 3.0);
        let skill_level = (0.7 * practice + 0.3 * breadth).clamp(0.0, 1.0);

        LearningSummary {
            total_interactions: self.history.len(),
            answered,
            success_rate,
            distinct_categories: distinct,
            skill_level,
        }
    }

    /// Categories with at least one answered query.
    pub fn learned_categories(&self) -> BTreeSet<String> {
        self.answered.keys().cloned().collect()
    }

    pub fn history(&self) -> &[UserInteraction] {
        &self.history
    }

    pub fn milestones(&self) -> &[LearningMilestone] {
        &self.milestones
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.preferences = preferences;
    }

    /// Whether the model updater should be called this tick.
    pub fn refresh_due(&self, tick: u64, interval: u64) -> bool {
        if interval == 0 || self.history.is_empty() {
            return false;
        }
        match self.last_refresh {
            None => true,
            Some(last) => tick.saturating_sub(last) >= interval,
        }
    }

    pub fn mark_refreshed(&mut self, tick: u64) {
        self.last_refresh = Some(tick);
    }

    /// The tail of the history handed to the model updater.
    pub fn recent(&self) -> &[UserInteraction] {
        let start = self.history.len().saturating_sub(REFRESH_WINDOW);
        &self.history[start..]
    }
}
