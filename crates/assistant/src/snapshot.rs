//! Context snapshot builder.
//!
//! Keeps a bounded window of user activity and condenses the part of it that
//! is still recent, together with the learning tracker's summary, into an
//! immutable [`ContextSnapshot`] once per tick.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::learning::LearningTracker;
use crate::types::{ActivityEvent, ActivityKind, AppDomain, UserPreferences};

/// Condensed view of the recent activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Events inside the recency horizon.
    pub event_count: usize,
    pub recent_errors: u32,
    pub recent_undos: u32,
    pub searches: u32,
    /// Most frequently used tool in the window (earliest wins ties).
    pub dominant_tool: Option<String>,
    /// Ticks since the last recent event (or since tick 0 if none).
    pub idle_ticks: u64,
}

/// Summarizes activity history. Pure and infallible.
///
/// `activity` only holds events inside the recency horizon, oldest first.
pub trait ContextAnalyzer: Send + Sync {
    fn summarize(&self, activity: &[ActivityEvent], now: u64) -> ActivitySummary;
}

/// Counting analyzer used when the host does not supply one.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicContextAnalyzer;

impl ContextAnalyzer for HeuristicContextAnalyzer {
    fn summarize(&self, activity: &[ActivityEvent], now: u64) -> ActivitySummary {
        let mut summary = ActivitySummary {
            event_count: activity.len(),
            ..Default::default()
        };

        // tool -> (uses, first position)
        let mut tools: BTreeMap<&str, (u32, usize)> = BTreeMap::new();
        for (position, event) in activity.iter().enumerate() {
            match event.kind {
                ActivityKind::CommandFailed => summary.recent_errors += 1,
                ActivityKind::Undo => summary.recent_undos += 1,
                ActivityKind::Search => summary.searches += 1,
                ActivityKind::ToolUsed => {
                    tools.entry(event.subject.as_str()).or_insert((0, position)).0 += 1;
                }
                ActivityKind::DocsOpened => {}
            }
        }

        summary.dominant_tool = tools
            .into_iter()
            .max_by(|(_, (uses_a, first_a)), (_, (uses_b, first_b))| {
                uses_a.cmp(uses_b).then(first_b.cmp(first_a))
            })
            .map(|(tool, _)| tool.to_string());

        let last = activity.iter().map(|event| event.tick).max().unwrap_or(0);
        summary.idle_ticks = now.saturating_sub(last);
        summary
    }
}

/// Immutable point-in-time summary handed to every node for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    pub tick: u64,
    pub domain: AppDomain,
    pub activity: ActivitySummary,
    /// Estimated user skill in `[0, 1]`.
    pub skill_level: f32,
    /// Categories the user already received answers for.
    pub learned_categories: BTreeSet<String>,
    pub preferences: UserPreferences,
    /// A query is queued or being interpreted.
    pub query_pending: bool,
}

impl ContextSnapshot {
    /// Short machine-readable rendering, used as `QueryResult::context`.
    pub fn describe(&self) -> String {
        format!(
            "domain={} tool={} skill={:.2} errors={} undos={} idle={}",
            self.domain,
            self.activity.dominant_tool.as_deref().unwrap_or("none"),
            self.skill_level,
            self.activity.recent_errors,
            self.activity.recent_undos,
            self.activity.idle_ticks,
        )
    }
}

/// Accumulates activity and assembles snapshots.
pub struct ContextSnapshotBuilder {
    analyzer: Arc<dyn ContextAnalyzer>,
    window: VecDeque<ActivityEvent>,
    capacity: usize,
    horizon: u64,
}

impl ContextSnapshotBuilder {
    /// Keeps at most `capacity` events; only those younger than `horizon`
    /// ticks reach the analyzer.
    pub fn new(analyzer: Arc<dyn ContextAnalyzer>, capacity: usize, horizon: u64) -> Self {
        Self {
            analyzer,
            window: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            horizon: horizon.max(1),
        }
    }

    /// Append an event, evicting the oldest once the window is full.
    pub fn record(&mut self, event: ActivityEvent) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(event);
    }

    pub fn recent(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.window.iter()
    }

    pub fn build(
        &mut self,
        tick: u64,
        domain: AppDomain,
        learning: &LearningTracker,
        query_pending: bool,
    ) -> ContextSnapshot {
        let horizon = self.horizon;
        let events = self.window.make_contiguous();
        // Events are recorded in tick order
        let fresh = events.partition_point(|event| tick.saturating_sub(event.tick) >= horizon);
        let activity = self.analyzer.summarize(&events[fresh..], tick);
        let summary = learning.summary();

        ContextSnapshot {
            tick,
            domain,
            activity,
            skill_level: summary.skill_level,
            learned_categories: learning.learned_categories(),
            preferences: learning.preferences().clone(),
            query_pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(tick: u64, kind: ActivityKind, subject: &str) -> ActivityEvent {
        ActivityEvent {
            tick,
            kind,
            subject: subject.to_string(),
        }
    }

    #[test]
    fn heuristic_counts_activity() {
        let activity = vec![
            event(1, ActivityKind::ToolUsed, "sculpt"),
            event(2, ActivityKind::ToolUsed, "rigidbody"),
            event(3, ActivityKind::CommandFailed, "bake"),
            event(4, ActivityKind::ToolUsed, "rigidbody"),
            event(5, ActivityKind::Undo, ""),
        ];

        let summary = HeuristicContextAnalyzer.summarize(&activity, 12);
        assert_eq!(summary.event_count, 5);
        assert_eq!(summary.recent_errors, 1);
        assert_eq!(summary.recent_undos, 1);
        assert_eq!(summary.dominant_tool.as_deref(), Some("rigidbody"));
        assert_eq!(summary.idle_ticks, 7);
    }

    #[test]
    fn dominant_tool_tie_goes_to_earliest() {
        let activity = vec![
            event(1, ActivityKind::ToolUsed, "zoom"),
            event(2, ActivityKind::ToolUsed, "brush"),
        ];
        let summary = HeuristicContextAnalyzer.summarize(&activity, 2);
        assert_eq!(summary.dominant_tool.as_deref(), Some("zoom"));
    }

    #[test]
    fn window_evicts_oldest() {
        let mut builder = ContextSnapshotBuilder::new(Arc::new(HeuristicContextAnalyzer), 2, 100);
        builder.record(event(1, ActivityKind::Undo, ""));
        builder.record(event(2, ActivityKind::Search, "gravity"));
        builder.record(event(3, ActivityKind::Search, "mass"));

        let ticks: Vec<u64> = builder.recent().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![2, 3]);

        let snapshot = builder.build(4, AppDomain::Game, &LearningTracker::default(), false);
        assert_eq!(snapshot.activity.recent_undos, 0);
        assert_eq!(snapshot.activity.searches, 2);
        assert!(snapshot.describe().starts_with("domain=game"));
    }

    #[test]
    fn events_past_the_horizon_are_not_recent() {
        let mut builder = ContextSnapshotBuilder::new(Arc::new(HeuristicContextAnalyzer), 8, 10);
        builder.record(event(1, ActivityKind::CommandFailed, "bake"));
        builder.record(event(1, ActivityKind::CommandFailed, "bake"));
        builder.record(event(6, ActivityKind::Undo, ""));

        let early = builder.build(10, AppDomain::Cad, &LearningTracker::default(), false);
        assert_eq!(early.activity.event_count, 3);
        assert_eq!(early.activity.recent_errors, 2);

        let later = builder.build(11, AppDomain::Cad, &LearningTracker::default(), false);
        assert_eq!(later.activity.event_count, 1);
        assert_eq!(later.activity.recent_errors, 0);
        assert_eq!(later.activity.recent_undos, 1);
        assert_eq!(later.activity.idle_ticks, 5);

        let quiet = builder.build(16, AppDomain::Cad, &LearningTracker::default(), false);
        assert_eq!(quiet.activity.event_count, 0);
        assert_eq!(builder.recent().count(), 3);
    }
}
