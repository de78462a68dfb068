//! Contextual assistant core for interactive creative tools.
//!
//! An [`Assistant`] observes user activity, interprets free-text queries
//! through pluggable NLP collaborators and ticks a behavior tree once per
//! host frame to decide whether to answer, suggest, adapt the UI or track
//! learning progress.
//!
//! Modules are organized by responsibility:
//! - [`assistant`] hosts the tick owner and its builder
//! - [`tree`], [`nodes`] and [`context`] define the decision tree and its blackboard
//! - [`state`] holds the coarse assistant mode and its transition table
//! - [`snapshot`], [`interpreter`], [`opportunity`], [`learning`],
//!   [`complexity`] and [`knowledge`] are the components leaf nodes dispatch to
//! - [`nlp`], [`ui`] and [`repository`] are the collaborator contracts
//! - [`events`] is the side channel for collaborator failures and invariant violations
pub mod assistant;
pub mod complexity;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod interpreter;
pub mod knowledge;
pub mod learning;
pub mod nlp;
pub mod nodes;
pub mod opportunity;
pub mod repository;
pub mod snapshot;
pub mod state;
pub mod tree;
pub mod types;
pub mod ui;

pub use assistant::{Assistant, AssistantBuilder, DEFAULT_PROFILE, TickReport};
pub use complexity::{ComplexityLevel, ComplexityTarget, UiComplexityAdapter};
pub use config::{AssistantConfig, OVERALL_CATEGORY};
pub use context::{AssistContext, Cycle};
pub use error::{AssistantError, Collaborator, CollaboratorError, ConfigError, Result};
pub use events::{ErrorChannel, ErrorKind, ErrorRecord};
pub use interpreter::{Interpretation, QueryInterpreter};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use learning::{
    LearningSnapshot, LearningSummary, LearningTracker, ModelUpdater, NoopModelUpdater,
};
pub use nlp::{
    Classification, CollaboratorResult, EntityExtractor, IntentClassifier, IntentRule,
    KeywordClassifier, KeywordEntityExtractor, NlpModels, Pending, Resolver,
};
pub use opportunity::{OpportunityAnalyzer, OpportunityDetector};
pub use repository::{
    FileHistoryRepository, HistoryRepository, InMemoryHistoryRepo, RepositoryError,
};
pub use snapshot::{
    ActivitySummary, ContextAnalyzer, ContextSnapshot, ContextSnapshotBuilder,
    HeuristicContextAnalyzer,
};
pub use state::{AssistantState, IllegalTransition, StateMachine};
pub use tree::{AssistTree, assistant_tree};
pub use types::{
    ActivityEvent, ActivityKind, AppDomain, AssistanceOpportunity, InteractionOutcome,
    LearningMilestone, QueryResult, UserInteraction, UserPreferences, Verbosity,
};
pub use ui::{AssistanceResponse, NO_ASSISTANCE, NullUi, ResponseSource, UiSink};
