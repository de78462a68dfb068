//! The assistant's decision tree.
//!
//! One guarded branch per [`AssistantState`]. Exactly one guard opens per
//! tick, so the root selector ticks a single branch:
//!
//! ```text
//! assistant_tree(cooldown)
//!   └─ Selector
//!       ├─ [ProcessingQuery]     query_branch()
//!       │   └─ Sequence
//!       │       ├─ InterpretQuery                      (Running while pending)
//!       │       └─ Selector
//!       │           ├─ Sequence(IsConfident, BeginAssistance)
//!       │           └─ DiscardQuery
//!       ├─ [ProvidingAssistance] assistance_branch()
//!       │   └─ Sequence(AlwaysSucceed(AnalyzeOpportunities), DispatchAssistance)
//!       ├─ [UpdatingUI]          AdaptComplexity
//!       ├─ [TrackingProgress]    progress_branch()
//!       │   └─ Sequence(RecordInteraction, AlwaysSucceed(CheckMilestones),
//!       │               RefreshModels, CompleteCycle)
//!       └─ [Idle]                proactive_branch(cooldown)
//!           └─ Sequence(ProactiveEnabled, HasRecentActivity,
//!                       Cooldown(Sequence(AnalyzeOpportunities, OfferSuggestion)))
//! ```

use behavior_tree::Behavior;
use behavior_tree::builder::{always_succeed, cooldown, guard, selector, sequence};

use crate::context::AssistContext;
use crate::nodes::*;
use crate::state::AssistantState;

pub type AssistTree = Box<dyn Behavior<AssistContext>>;

/// Build the full tree. `suggestion_cooldown` is the minimum number of ticks
/// between two proactive suggestions.
pub fn assistant_tree(suggestion_cooldown: u64) -> AssistTree {
    selector(vec![
        in_state(AssistantState::ProcessingQuery, query_branch()),
        in_state(AssistantState::ProvidingAssistance, assistance_branch()),
        in_state(AssistantState::UpdatingUI, Box::new(AdaptComplexity)),
        in_state(AssistantState::TrackingProgress, progress_branch()),
        in_state(AssistantState::Idle, proactive_branch(suggestion_cooldown)),
    ])
}

/// Gate `branch` on the state captured at the start of the tick.
pub fn in_state(state: AssistantState, branch: AssistTree) -> AssistTree {
    guard(move |ctx: &AssistContext| ctx.state == state, branch)
}

pub fn query_branch() -> AssistTree {
    sequence(vec![
        Box::new(InterpretQuery),
        selector(vec![
            sequence(vec![Box::new(IsConfident), Box::new(BeginAssistance)]),
            Box::new(DiscardQuery),
        ]),
    ])
}

pub fn assistance_branch() -> AssistTree {
    sequence(vec![
        always_succeed(Box::new(AnalyzeOpportunities)),
        Box::new(DispatchAssistance),
    ])
}

pub fn progress_branch() -> AssistTree {
    sequence(vec![
        Box::new(RecordInteraction),
        always_succeed(Box::new(CheckMilestones)),
        Box::new(RefreshModels),
        Box::new(CompleteCycle),
    ])
}

pub fn proactive_branch(suggestion_cooldown: u64) -> AssistTree {
    sequence(vec![
        Box::new(ProactiveEnabled),
        Box::new(HasRecentActivity),
        cooldown(
            suggestion_cooldown,
            sequence(vec![Box::new(AnalyzeOpportunities), Box::new(OfferSuggestion)]),
        ),
    ])
}
