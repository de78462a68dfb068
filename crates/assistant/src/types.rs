//! Shared value types passed between the assistant components.

use serde::{Deserialize, Serialize};

/// Application domain the assistant is embedded in.
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
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AppDomain {
    /// Game editor (scenes, physics, scripting)
    Game,
    /// CAD modeller (sketches, constraints, features)
    Cad,
    /// Animation suite (rigs, keyframes, curves)
    Animation,
    /// No specific domain
    #[default]
    General,
}

/// Structured interpretation of one free-text query.
///
/// Immutable once produced by the query interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub intent: String,
    /// Classifier confidence, clamped to `[0, 1]`.
    pub confidence: f32,
    /// Extracted entities in order of appearance.
    pub entities: Vec<String>,
    /// Rendering of the context snapshot the query was interpreted against.
    pub context: String,
}

/// A candidate for proactive help, produced fresh by each analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistanceOpportunity {
    #[serde(rename = "type")]
    pub kind: String,
    /// Relevance in `[0, 1]`.
    pub relevance: f32,
    pub suggestion: String,
    pub resources: Vec<String>,
}

/// What the user just did in the host application.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActivityKind {
    /// A tool or panel was used (subject: tool name)
    ToolUsed,
    /// A command failed (subject: command)
    CommandFailed,
    /// The user undid an operation
    Undo,
    /// The user searched menus or help (subject: search term)
    Search,
    /// The user opened documentation (subject: topic)
    DocsOpened,
}

/// One observed user activity, stamped with the assistant tick it arrived on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub tick: u64,
    pub kind: ActivityKind,
    pub subject: String,
}

/// How an interaction ended.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum InteractionOutcome {
    /// A query was answered with a response.
    Answered,
    /// A query was dropped because the classifier was not confident enough.
    LowConfidence,
    /// A proactive suggestion was shown.
    Suggested,
}

/// A completed interaction, appended to the learning history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInteraction {
    pub tick: u64,
    /// Intent label for queries, opportunity type for suggestions.
    pub category: String,
    pub query: Option<QueryResult>,
    pub outcome: InteractionOutcome,
}

/// How much text responses should carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verbosity {
    Brief,
    #[default]
    Detailed,
}

/// User-controlled knobs, persisted with the learning history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Whether the assistant may interrupt with unsolicited suggestions.
    pub proactive_suggestions: bool,
    /// Pins the UI complexity instead of deriving it from skill.
    pub complexity_override: Option<f32>,
    pub verbosity: Verbosity,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            proactive_suggestions: true,
            complexity_override: None,
            verbosity: Verbosity::default(),
        }
    }
}

/// A learning threshold that was crossed. Fires at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningMilestone {
    pub category: String,
    pub threshold: u32,
    pub reached_at: u64,
}
