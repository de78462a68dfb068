//! Rendering collaborator contract.
//!
//! The assistant decides *what* to show; the host decides how it is drawn.

use serde::Serialize;

use crate::complexity::ComplexityTarget;
use crate::types::LearningMilestone;

/// Message shown when a query cannot be answered.
pub const NO_ASSISTANCE: &str = "No assistance available right now.";

/// Where a response came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResponseSource {
    /// Answer to a user query.
    Query { intent: String },
    /// Unsolicited suggestion.
    Suggestion { kind: String },
    /// Failed or low-confidence query.
    Neutral,
}

/// Payload handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistanceResponse {
    #[serde(flatten)]
    pub source: ResponseSource,
    pub message: String,
    pub resources: Vec<String>,
    /// Related proactive tip attached to a query answer.
    pub follow_up: Option<String>,
}

impl AssistanceResponse {
    /// The neutral "nothing to offer" response.
    pub fn neutral() -> Self {
        Self {
            source: ResponseSource::Neutral,
            message: NO_ASSISTANCE.to_string(),
            resources: Vec::new(),
            follow_up: None,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.source == ResponseSource::Neutral
    }
}

/// Host-side renderer. Calls happen synchronously inside a tick and must not
/// block.
pub trait UiSink: Send + Sync {
    fn present(&self, response: &AssistanceResponse);

    fn apply_complexity(&self, target: ComplexityTarget);

    fn milestone_reached(&self, _milestone: &LearningMilestone) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullUi;

impl UiSink for NullUi {
    fn present(&self, _response: &AssistanceResponse) {}

    fn apply_complexity(&self, _target: ComplexityTarget) {}
}
