//! Condition nodes.
//!
//! Conditions only read the blackboard. They never mutate it.

use behavior_tree::{Behavior, Status};

use crate::context::AssistContext;

fn check(condition: bool) -> Status {
    if condition {
        Status::Success
    } else {
        Status::Failure
    }
}

/// Succeeds when the interpreted query meets the confidence threshold.
///
/// The comparison is inclusive: a confidence equal to the threshold passes.
pub struct IsConfident;

impl Behavior<AssistContext> for IsConfident {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        match &ctx.cycle.result {
            Some(result) => check(result.confidence >= ctx.config.confidence_threshold),
            None => Status::Failure,
        }
    }
}

/// Succeeds when some activity is still inside the recency horizon.
pub struct HasRecentActivity;

impl Behavior<AssistContext> for HasRecentActivity {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        check(ctx.snapshot.activity.event_count > 0)
    }
}

/// Succeeds when the user allows unsolicited suggestions.
pub struct ProactiveEnabled;

impl Behavior<AssistContext> for ProactiveEnabled {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        check(ctx.snapshot.preferences.proactive_suggestions && !ctx.snapshot.query_pending)
    }
}
