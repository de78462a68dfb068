//! Coarse-grained assistant mode and its transition table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The single active mode of an assistant instance.
///
/// Owned by [`StateMachine`] and only changed at tick boundaries. Behavior
/// tree branches read it to decide whether they are eligible this tick.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
pub enum AssistantState {
    #[default]
    Idle,
    ProcessingQuery,
    ProvidingAssistance,
    #[strum(serialize = "UpdatingUI")]
    UpdatingUI,
    TrackingProgress,
}

impl AssistantState {
    /// Returns `true` if the transition table allows moving to `next`.
    ///
    /// Every state may fall back to `Idle`. `Idle -> ProvidingAssistance`
    /// is the proactive suggestion path.
    pub fn can_transition_to(self, next: AssistantState) -> bool {
        use AssistantState::*;

        matches!(
            (self, next),
            (_, Idle)
                | (Idle, ProcessingQuery)
                | (Idle, ProvidingAssistance)
                | (ProcessingQuery, ProvidingAssistance)
                | (ProvidingAssistance, UpdatingUI)
                | (UpdatingUI, TrackingProgress)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: AssistantState,
    pub to: AssistantState,
}

/// Owner of the current [`AssistantState`].
#[derive(Debug, Default)]
pub struct StateMachine {
    current: AssistantState,
    transitions: u64,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> AssistantState {
        self.current
    }

    /// Number of state changes applied so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Move to `next` if the table allows it. Moving to the current state is
    /// a no-op.
    pub fn transition(&mut self, next: AssistantState) -> Result<(), IllegalTransition> {
        if next == self.current {
            return Ok(());
        }
        if !self.current.can_transition_to(next) {
            return Err(IllegalTransition {
                from: self.current,
                to: next,
            });
        }

        tracing::info!(from = %self.current, to = %next, "assistant state changed");
        self.current = next;
        self.transitions += 1;
        Ok(())
    }

    /// Unconditionally return to `Idle` (reset/cancel).
    pub fn force_idle(&mut self) {
        if self.current != AssistantState::Idle {
            tracing::info!(from = %self.current, "assistant state forced to Idle");
            self.current = AssistantState::Idle;
            self.transitions += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AssistantState::*;

    #[test]
    fn full_query_cycle_is_legal() {
        let mut machine = StateMachine::new();
        for next in [
            ProcessingQuery,
            ProvidingAssistance,
            UpdatingUI,
            TrackingProgress,
            Idle,
        ] {
            machine.transition(next).unwrap();
        }
        assert_eq!(machine.current(), Idle);
        assert_eq!(machine.transitions(), 5);
    }

    #[test]
    fn low_confidence_returns_to_idle() {
        let mut machine = StateMachine::new();
        machine.transition(ProcessingQuery).unwrap();
        machine.transition(Idle).unwrap();
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn skipping_states_is_rejected() {
        let mut machine = StateMachine::new();
        let err = machine.transition(TrackingProgress).unwrap_err();
        assert_eq!(
            err,
            IllegalTransition {
                from: Idle,
                to: TrackingProgress
            }
        );
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn force_idle_from_anywhere() {
        let mut machine = StateMachine::new();
        machine.transition(ProcessingQuery).unwrap();
        machine.force_idle();
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn display_names() {
        assert_eq!(UpdatingUI.to_string(), "UpdatingUI");
        assert_eq!(ProcessingQuery.to_string(), "ProcessingQuery");
    }
}
