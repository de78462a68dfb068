//! Action nodes.
//!
//! Each action performs one unit of work against a component and, where the
//! cycle moves on, requests the next [`AssistantState`]. Only
//! [`InterpretQuery`] ever returns `Running`.

use behavior_tree::{Behavior, Status};

use crate::context::AssistContext;
use crate::error::Collaborator;
use crate::interpreter::Interpretation;
use crate::state::AssistantState;
use crate::types::{InteractionOutcome, UserInteraction};
use crate::ui::{AssistanceResponse, ResponseSource};

/// Hands the queued query to the interpreter and waits for the result.
///
/// Returns `Running` while the classifier is working; the enclosing sequence
/// resumes this node on the next tick instead of starting a new
/// interpretation. On a collaborator failure the error is published, a
/// neutral response is shown and the assistant falls back to `Idle`.
///
/// # Example
///
/// ```rust,ignore
/// sequence(vec![
///     Box::new(InterpretQuery),
///     selector(vec![
///         sequence(vec![Box::new(IsConfident), Box::new(BeginAssistance)]),
///         Box::new(DiscardQuery),
///     ]),
/// ])
/// ```
pub struct InterpretQuery;

impl Behavior<AssistContext> for InterpretQuery {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        if !ctx.interpreter.is_in_flight() {
            let Some(text) = ctx.cycle.input.take() else {
                ctx.report_invariant("processing a query with no input");
                return Status::Failure;
            };
            if let Err(error) = ctx.interpreter.begin(&text, &ctx.snapshot) {
                ctx.report_invariant(error.to_string());
                return Status::Failure;
            }
        }

        match ctx.interpreter.poll() {
            Some(Interpretation::Pending) => Status::Running,
            Some(Interpretation::Ready(result)) => {
                ctx.cycle.result = Some(result);
                Status::Success
            }
            Some(Interpretation::Failed {
                collaborator,
                error,
            }) => {
                ctx.errors
                    .collaborator_unavailable(ctx.tick, collaborator, &error);
                ctx.ui.present(&AssistanceResponse::neutral());
                ctx.clear_cycle();
                ctx.request_transition(AssistantState::Idle);
                Status::Failure
            }
            None => {
                ctx.report_invariant("query interpreter lost its in-flight request");
                Status::Failure
            }
        }
    }
}

/// Moves a confident query on to `ProvidingAssistance`.
pub struct BeginAssistance;

impl Behavior<AssistContext> for BeginAssistance {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        ctx.request_transition(AssistantState::ProvidingAssistance);
        Status::Success
    }
}

/// Drops a low-confidence query: records it, shows the neutral response and
/// returns to `Idle`. Dropped queries are not retried.
pub struct DiscardQuery;

impl Behavior<AssistContext> for DiscardQuery {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        if let Some(result) = ctx.cycle.result.take() {
            tracing::info!(
                intent = %result.intent,
                confidence = result.confidence,
                threshold = ctx.config.confidence_threshold,
                "query dropped: low confidence"
            );
            ctx.learning.record(UserInteraction {
                tick: ctx.tick,
                category: result.intent.clone(),
                query: Some(result),
                outcome: InteractionOutcome::LowConfidence,
            });
        }

        ctx.ui.present(&AssistanceResponse::neutral());
        ctx.clear_cycle();
        ctx.request_transition(AssistantState::Idle);
        Status::Success
    }
}

/// Runs the opportunity analyzer and stores the surfaced candidates.
///
/// Fails when nothing clears the relevance floor.
pub struct AnalyzeOpportunities;

impl Behavior<AssistContext> for AnalyzeOpportunities {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        let surfaced = ctx.opportunities.analyze(&ctx.snapshot);
        let found = !surfaced.is_empty();
        ctx.cycle.opportunities = surfaced;

        if found {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// Turns the best opportunity into a pending suggestion and starts a
/// proactive cycle.
pub struct OfferSuggestion;

impl Behavior<AssistContext> for OfferSuggestion {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        let Some(best) = ctx.cycle.opportunities.first() else {
            return Status::Failure;
        };

        tracing::debug!(kind = %best.kind, relevance = best.relevance, "offering suggestion");
        ctx.cycle.response = Some(ctx.knowledge.suggestion(best));
        ctx.request_transition(AssistantState::ProvidingAssistance);
        Status::Success
    }
}

/// Sends the response for the current cycle to the UI.
///
/// Query answers are composed here from the knowledge base, with the best
/// surfaced opportunity attached as a follow-up tip. Suggestions prepared by
/// [`OfferSuggestion`] are sent as they are.
pub struct DispatchAssistance;

impl Behavior<AssistContext> for DispatchAssistance {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        let response = if let Some(response) = ctx.cycle.response.take() {
            response
        } else if let Some(result) = &ctx.cycle.result {
            let mut response = ctx
                .knowledge
                .answer(result, ctx.snapshot.preferences.verbosity);
            response.follow_up = ctx
                .cycle
                .opportunities
                .first()
                .map(|opportunity| opportunity.suggestion.clone());
            response
        } else {
            ctx.report_invariant("providing assistance without a query or suggestion");
            return Status::Failure;
        };

        let interaction = match &response.source {
            ResponseSource::Suggestion { kind } => UserInteraction {
                tick: ctx.tick,
                category: kind.clone(),
                query: None,
                outcome: InteractionOutcome::Suggested,
            },
            ResponseSource::Query { intent } => UserInteraction {
                tick: ctx.tick,
                category: intent.clone(),
                query: ctx.cycle.result.clone(),
                outcome: InteractionOutcome::Answered,
            },
            ResponseSource::Neutral => {
                ctx.report_invariant("neutral response reached dispatch");
                return Status::Failure;
            }
        };

        tracing::info!(
            tick = ctx.tick,
            category = %interaction.category,
            outcome = %interaction.outcome,
            "assistance dispatched"
        );
        ctx.ui.present(&response);
        ctx.cycle.response = Some(response);
        ctx.cycle.interaction = Some(interaction);
        ctx.request_transition(AssistantState::UpdatingUI);
        Status::Success
    }
}

/// Recomputes the UI complexity target and forwards real changes.
pub struct AdaptComplexity;

impl Behavior<AssistContext> for AdaptComplexity {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        let summary = ctx.learning.summary();
        if let Some(target) = ctx.complexity.adapt(&summary, &ctx.snapshot) {
            ctx.ui.apply_complexity(target);
        }
        ctx.request_transition(AssistantState::TrackingProgress);
        Status::Success
    }
}

/// Appends the cycle's interaction to the learning history.
pub struct RecordInteraction;

impl Behavior<AssistContext> for RecordInteraction {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        if let Some(interaction) = ctx.cycle.interaction.take() {
            ctx.learning.record(interaction);
        }
        Status::Success
    }
}

/// Fires newly reached milestones. Fails when none fired.
pub struct CheckMilestones;

impl Behavior<AssistContext> for CheckMilestones {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        let fired = ctx.learning.detect_milestones(ctx.tick, &ctx.config);
        for milestone in &fired {
            ctx.ui.milestone_reached(milestone);
        }

        if fired.is_empty() {
            Status::Failure
        } else {
            Status::Success
        }
    }
}

/// Calls the model updater when the refresh interval has elapsed.
///
/// Fire-and-forget: always succeeds. Updater failures go to the error
/// channel.
pub struct RefreshModels;

impl Behavior<AssistContext> for RefreshModels {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        if !ctx
            .learning
            .refresh_due(ctx.tick, ctx.config.model_refresh_interval)
        {
            return Status::Success;
        }

        let summary = ctx.learning.summary();
        match ctx.model_updater.refresh(&summary, ctx.learning.recent()) {
            Ok(()) => tracing::debug!(tick = ctx.tick, "model refresh requested"),
            Err(error) => {
                ctx.errors
                    .collaborator_unavailable(ctx.tick, Collaborator::ModelUpdater, &error)
            }
        }
        ctx.learning.mark_refreshed(ctx.tick);
        Status::Success
    }
}

/// Ends the cycle and returns to `Idle`.
pub struct CompleteCycle;

impl Behavior<AssistContext> for CompleteCycle {
    fn tick(&mut self, ctx: &mut AssistContext) -> Status {
        ctx.clear_cycle();
        ctx.request_transition(AssistantState::Idle);
        Status::Success
    }
}
