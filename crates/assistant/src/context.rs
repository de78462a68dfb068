//! Blackboard handed to every behavior tree node.
//!
//! The [`AssistContext`] owns the assistant's components so the tree can be
//! stored next to it and ticked with a single `&mut` borrow. It provides:
//!
//! - The read-only state and context snapshot for the current tick
//! - The components leaf nodes dispatch to
//! - The per-cycle scratch data ([`Cycle`]) passed from one state to the next
//! - A slot for the state change requested this tick
//!
//! Nodes never change [`AssistantState`] directly. They request a
//! transition, and the assistant applies it after the tick completes.

use std::sync::Arc;

use behavior_tree::Clock;

use crate::complexity::UiComplexityAdapter;
use crate::config::AssistantConfig;
use crate::events::ErrorChannel;
use crate::interpreter::QueryInterpreter;
use crate::knowledge::KnowledgeBase;
use crate::learning::{LearningTracker, ModelUpdater};
use crate::opportunity::OpportunityAnalyzer;
use crate::snapshot::ContextSnapshot;
use crate::state::AssistantState;
use crate::types::{AssistanceOpportunity, QueryResult, UserInteraction};
use crate::ui::{AssistanceResponse, UiSink};

/// Data carried through one query or suggestion cycle.
///
/// Cleared when the cycle completes, is dropped, or is cancelled.
#[derive(Debug, Default)]
pub struct Cycle {
    /// Query text waiting to be handed to the interpreter.
    pub input: Option<String>,
    pub result: Option<QueryResult>,
    /// Opportunities surfaced by the latest analysis pass, best first.
    pub opportunities: Vec<AssistanceOpportunity>,
    pub response: Option<AssistanceResponse>,
    /// Interaction to append to the learning history.
    pub interaction: Option<UserInteraction>,
}

pub struct AssistContext {
    /// Monotonic tick counter. The first update is tick 1.
    pub tick: u64,
    /// State at the start of this tick. Read-only for nodes.
    pub state: AssistantState,
    pub snapshot: ContextSnapshot,
    pub config: AssistantConfig,

    pub interpreter: QueryInterpreter,
    pub opportunities: OpportunityAnalyzer,
    pub learning: LearningTracker,
    pub complexity: UiComplexityAdapter,
    pub knowledge: KnowledgeBase,

    pub ui: Arc<dyn UiSink>,
    pub model_updater: Arc<dyn ModelUpdater>,
    pub errors: ErrorChannel,

    pub cycle: Cycle,

    requested: Option<AssistantState>,
    violation: Option<String>,
}

impl AssistContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AssistantConfig,
        interpreter: QueryInterpreter,
        opportunities: OpportunityAnalyzer,
        learning: LearningTracker,
        knowledge: KnowledgeBase,
        ui: Arc<dyn UiSink>,
        model_updater: Arc<dyn ModelUpdater>,
        errors: ErrorChannel,
    ) -> Self {
        let complexity = UiComplexityAdapter::new(config.complexity_hysteresis);
        Self {
            tick: 0,
            state: AssistantState::Idle,
            snapshot: ContextSnapshot::default(),
            config,
            interpreter,
            opportunities,
            learning,
            complexity,
            knowledge,
            ui,
            model_updater,
            errors,
            cycle: Cycle::default(),
            requested: None,
            violation: None,
        }
    }

    /// Ask for a state change at the end of this tick.
    ///
    /// A second, different request in the same tick is an invariant
    /// violation; the first request is kept.
    pub fn request_transition(&mut self, next: AssistantState) {
        match self.requested {
            Some(previous) if previous != next => self.report_invariant(format!(
                "conflicting transitions requested in one tick: {previous} and {next}"
            )),
            _ => self.requested = Some(next),
        }
    }

    pub(crate) fn take_transition(&mut self) -> Option<AssistantState> {
        self.requested.take()
    }

    /// Flag a programming or integration error. Handled by the assistant
    /// after the tick.
    pub fn report_invariant(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(tick = self.tick, %message, "invariant violation flagged");
        // keep the first
        self.violation.get_or_insert(message);
    }

    pub(crate) fn take_violation(&mut self) -> Option<String> {
        self.violation.take()
    }

    /// Drop everything belonging to the current cycle.
    pub fn clear_cycle(&mut self) {
        self.cycle = Cycle::default();
    }
}

impl Clock for AssistContext {
    fn now(&self) -> u64 {
        self.tick
    }
}
