//! Opportunity analyzer.
//!
//! Scans the context snapshot for moments where unsolicited help is worth an
//! interruption, and ranks the candidates.
//!
//! # Ranking
//!
//! Candidates are produced by detectors in a fixed order, filtered to those
//! strictly above the relevance floor, and stable-sorted by descending
//! relevance, so equal scores keep detector order.
//!
//! # Flicker suppression
//!
//! When a candidate of the same type as last pass comes back with a relevance
//! within `epsilon` of the previous one, the previous suggestion text and
//! resources are reused. The relevance is always the fresh one, so the
//! surfaced order never depends on the previous pass.

use crate::snapshot::ContextSnapshot;
use crate::types::{AppDomain, AssistanceOpportunity};

/// Produces at most one opportunity from a snapshot.
pub trait OpportunityDetector: Send + Sync {
    fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity>;
}

/// Keep candidates strictly above `floor`, best first, ties in input order.
pub fn rank(mut candidates: Vec<AssistanceOpportunity>, floor: f32) -> Vec<AssistanceOpportunity> {
    candidates.retain(|candidate| candidate.relevance > floor);
    // sort_by is stable
    candidates.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    candidates
}

pub struct OpportunityAnalyzer {
    detectors: Vec<Box<dyn OpportunityDetector>>,
    floor: f32,
    epsilon: f32,
    previous: Vec<AssistanceOpportunity>,
}

impl OpportunityAnalyzer {
    pub fn new(detectors: Vec<Box<dyn OpportunityDetector>>, floor: f32, epsilon: f32) -> Self {
        Self {
            detectors,
            floor,
            epsilon,
            previous: Vec::new(),
        }
    }

    /// Analyzer with the built-in detectors.
    pub fn with_defaults(floor: f32, epsilon: f32, idle_after: u64) -> Self {
        Self::new(default_detectors(idle_after), floor, epsilon)
    }

    /// Run every detector and return the surfaced opportunities, best first.
    pub fn analyze(&mut self, snapshot: &ContextSnapshot) -> Vec<AssistanceOpportunity> {
        let candidates = self
            .detectors
            .iter()
            .filter_map(|detector| detector.detect(snapshot))
            .collect();

        let surfaced: Vec<AssistanceOpportunity> = rank(candidates, self.floor)
            .into_iter()
            .map(|mut fresh| {
                if let Some(old) = self.previous.iter().find(|old| {
                    old.kind == fresh.kind
                        && (old.relevance - fresh.relevance).abs() <= self.epsilon
                }) {
                    fresh.suggestion.clone_from(&old.suggestion);
                    fresh.resources.clone_from(&old.resources);
                }
                fresh
            })
            .collect();

        tracing::debug!(
            tick = snapshot.tick,
            surfaced = surfaced.len(),
            "opportunity analysis"
        );
        self.previous = surfaced.clone();
        surfaced
    }

    /// Forget the cached pass.
    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

/// Built-in detectors, in evaluation order.
pub fn default_detectors(idle_after: u64) -> Vec<Box<dyn OpportunityDetector>> {
    vec![
        Box::new(ErrorStreakDetector),
        Box::new(UndoChurnDetector),
        Box::new(FeatureDiscoveryDetector),
        Box::new(IdleDetector { idle_after }),
    ]
}

/// Repeated command failures.
pub struct ErrorStreakDetector;

impl OpportunityDetector for ErrorStreakDetector {
    fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
        let errors = snapshot.activity.recent_errors;
        if errors < 2 {
            return None;
        }
        let tool = snapshot.activity.dominant_tool.as_deref().unwrap_or("this step");
        Some(AssistanceOpportunity {
            kind: "troubleshooting".to_string(),
            relevance: (0.3 + 0.15 * errors as f32).min(1.0),
            suggestion: format!(
                "A few commands failed recently. Want a walkthrough for {tool}?"
            ),
            resources: vec![format!("{}/troubleshooting", docs_root(snapshot.domain))],
        })
    }
}

/// Lots of undo in a short window.
pub struct UndoChurnDetector;

impl OpportunityDetector for UndoChurnDetector {
    fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
        let undos = snapshot.activity.recent_undos;
        if undos < 3 {
            return None;
        }
        Some(AssistanceOpportunity {
            kind: "workflow_tip".to_string(),
            relevance: (0.15 * undos as f32).min(0.9),
            suggestion: "Undoing a lot? Non-destructive editing keeps earlier versions around."
                .to_string(),
            resources: vec![format!("{}/non-destructive-workflow", docs_root(snapshot.domain))],
        })
    }
}

/// A tool the user keeps reaching for but has never asked about, while still
/// inexperienced.
pub struct FeatureDiscoveryDetector;

impl OpportunityDetector for FeatureDiscoveryDetector {
    fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
        let tool = snapshot.activity.dominant_tool.as_deref()?;
        if snapshot.skill_level >= 0.5 || snapshot.learned_categories.contains(tool) {
            return None;
        }
        Some(AssistanceOpportunity {
            kind: "feature_discovery".to_string(),
            relevance: 0.4 + 0.3 * (1.0 - snapshot.skill_level),
            suggestion: format!("You use {tool} a lot. Here are a few shortcuts for it."),
            resources: vec![format!("{}/tools/{tool}", docs_root(snapshot.domain))],
        })
    }
}

/// The user went quiet after working for a while.
pub struct IdleDetector {
    pub idle_after: u64,
}

impl OpportunityDetector for IdleDetector {
    fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
        if snapshot.activity.event_count == 0 || snapshot.activity.idle_ticks < self.idle_after {
            return None;
        }
        Some(AssistanceOpportunity {
            kind: "next_step".to_string(),
            relevance: 0.5,
            suggestion: "Not sure what to do next? Ask me anything about the current scene."
                .to_string(),
            resources: vec![format!("{}/getting-started", docs_root(snapshot.domain))],
        })
    }
}

fn docs_root(domain: AppDomain) -> &'static str {
    match domain {
        AppDomain::Game => "docs/game",
        AppDomain::Cad => "docs/cad",
        AppDomain::Animation => "docs/animation",
        AppDomain::General => "docs",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ActivitySummary;

    fn opportunity(kind: &str, relevance: f32) -> AssistanceOpportunity {
        AssistanceOpportunity {
            kind: kind.to_string(),
            relevance,
            suggestion: format!("{kind} at {relevance}"),
            resources: Vec::new(),
        }
    }

    /// Reports a fixed opportunity with a relevance the test can change.
    struct Fixed(std::sync::Mutex<AssistanceOpportunity>);

    impl OpportunityDetector for Fixed {
        fn detect(&self, _snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
            Some(self.0.lock().unwrap().clone())
        }
    }

    #[test]
    fn ranking_is_stable_and_floored() {
        let ranked = rank(
            vec![
                opportunity("first", 0.9),
                opportunity("low", 0.3),
                opportunity("second", 0.9),
                opportunity("mid", 0.5),
            ],
            0.4,
        );

        let kinds: Vec<&str> = ranked.iter().map(|o| o.kind.as_str()).collect();
        assert_eq!(kinds, vec!["first", "second", "mid"]);
    }

    #[test]
    fn floor_is_exclusive() {
        let ranked = rank(vec![opportunity("edge", 0.4)], 0.4);
        assert!(ranked.is_empty());
    }

    #[test]
    fn small_relevance_drift_reuses_previous_suggestion() {
        let detector = std::sync::Arc::new(Fixed(std::sync::Mutex::new(opportunity(
            "troubleshooting",
            0.60,
        ))));

        struct Shared(std::sync::Arc<Fixed>);
        impl OpportunityDetector for Shared {
            fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
                self.0.detect(snapshot)
            }
        }

        let mut analyzer =
            OpportunityAnalyzer::new(vec![Box::new(Shared(detector.clone()))], 0.4, 0.05);
        let snapshot = ContextSnapshot::default();

        let first = analyzer.analyze(&snapshot);
        assert_eq!(first[0].suggestion, "troubleshooting at 0.6");

        *detector.0.lock().unwrap() = opportunity("troubleshooting", 0.63);
        let second = analyzer.analyze(&snapshot);
        assert_eq!(second[0].suggestion, "troubleshooting at 0.6");
        assert_eq!(second[0].relevance, 0.63);

        *detector.0.lock().unwrap() = opportunity("troubleshooting", 0.8);
        let third = analyzer.analyze(&snapshot);
        assert_eq!(third[0].suggestion, "troubleshooting at 0.8");
    }

    #[test]
    fn reused_suggestion_keeps_fresh_relevance_in_ranking() {
        let first = std::sync::Arc::new(Fixed(std::sync::Mutex::new(opportunity("a", 0.60))));
        let second = std::sync::Arc::new(Fixed(std::sync::Mutex::new(opportunity("b", 0.50))));

        struct Shared(std::sync::Arc<Fixed>);
        impl OpportunityDetector for Shared {
            fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
                self.0.detect(snapshot)
            }
        }

        let mut analyzer = OpportunityAnalyzer::new(
            vec![
                Box::new(Shared(first.clone())),
                Box::new(Shared(second.clone())),
            ],
            0.4,
            0.05,
        );
        let snapshot = ContextSnapshot::default();
        analyzer.analyze(&snapshot);

        *first.0.lock().unwrap() = opportunity("a", 0.64);
        *second.0.lock().unwrap() = opportunity("b", 0.62);
        let surfaced = analyzer.analyze(&snapshot);

        let ranked: Vec<(&str, f32)> = surfaced
            .iter()
            .map(|o| (o.kind.as_str(), o.relevance))
            .collect();
        assert_eq!(ranked, vec![("a", 0.64), ("b", 0.62)]);
        assert_eq!(surfaced[0].suggestion, "a at 0.6");
        assert!(surfaced.windows(2).all(|pair| pair[0].relevance >= pair[1].relevance));
    }

    #[test]
    fn cleared_analyzer_composes_fresh_suggestions() {
        let detector = std::sync::Arc::new(Fixed(std::sync::Mutex::new(opportunity(
            "workflow_tip",
            0.70,
        ))));

        struct Shared(std::sync::Arc<Fixed>);
        impl OpportunityDetector for Shared {
            fn detect(&self, snapshot: &ContextSnapshot) -> Option<AssistanceOpportunity> {
                self.0.detect(snapshot)
            }
        }

        let mut analyzer =
            OpportunityAnalyzer::new(vec![Box::new(Shared(detector.clone()))], 0.4, 0.05);
        let snapshot = ContextSnapshot::default();
        analyzer.analyze(&snapshot);

        analyzer.clear();
        *detector.0.lock().unwrap() = opportunity("workflow_tip", 0.72);
        let surfaced = analyzer.analyze(&snapshot);
        assert_eq!(surfaced[0].suggestion, "workflow_tip at 0.72");
    }

    #[test]
    fn error_streak_outranks_idle() {
        let snapshot = ContextSnapshot {
            domain: AppDomain::Game,
            skill_level: 0.9,
            activity: ActivitySummary {
                event_count: 6,
                recent_errors: 3,
                idle_ticks: 200,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut analyzer = OpportunityAnalyzer::with_defaults(0.4, 0.05, 90);
        let surfaced = analyzer.analyze(&snapshot);

        let kinds: Vec<&str> = surfaced.iter().map(|o| o.kind.as_str()).collect();
        assert_eq!(kinds, vec!["troubleshooting", "next_step"]);
        assert_eq!(surfaced[0].resources, vec!["docs/game/troubleshooting"]);
    }

    #[test]
    fn quiet_session_surfaces_nothing() {
        let mut analyzer = OpportunityAnalyzer::with_defaults(0.4, 0.05, 90);
        assert!(analyzer.analyze(&ContextSnapshot::default()).is_empty());
    }
}
