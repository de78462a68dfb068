//! The assistant instance: owner of the tree, the state machine and the
//! blackboard.
//!
//! Hosts call [`Assistant::update`] once per frame. Every update is exactly
//! one tick:
//!
//! 1. Tick boundary (in): apply a pending cancel, then move `Idle` to
//!    `ProcessingQuery` if a query is queued
//! 2. Build the context snapshot for this tick
//! 3. Tick the root with the state frozen for the whole pass
//! 4. Tick boundary (out): handle invariant violations, then apply the
//!    transition requested by the nodes

use std::collections::VecDeque;
use std::sync::Arc;

use behavior_tree::Status;
use tokio::sync::broadcast;

use crate::complexity::ComplexityTarget;
use crate::config::AssistantConfig;
use crate::context::{AssistContext, Cycle};
use crate::error::{AssistantError, Collaborator, CollaboratorError, Result};
use crate::events::{ErrorChannel, ErrorRecord};
use crate::interpreter::QueryInterpreter;
use crate::knowledge::KnowledgeBase;
use crate::learning::{LearningTracker, ModelUpdater, NoopModelUpdater};
use crate::nlp::NlpModels;
use crate::opportunity::{OpportunityAnalyzer, OpportunityDetector, default_detectors};
use crate::repository::{HistoryRepository, RepositoryError, validate_profile};
use crate::snapshot::{ContextAnalyzer, ContextSnapshotBuilder, HeuristicContextAnalyzer};
use crate::state::{AssistantState, StateMachine};
use crate::tree::{AssistTree, assistant_tree};
use crate::types::{ActivityEvent, ActivityKind, UserPreferences};
use crate::ui::{NullUi, UiSink};

/// Profile name used when the host does not pick one.
pub const DEFAULT_PROFILE: &str = "default";

/// What happened during one [`Assistant::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Status returned by the root node.
    pub status: Status,
    /// State after the tick boundary.
    pub state: AssistantState,
}

pub struct Assistant {
    tree: AssistTree,
    machine: StateMachine,
    context: AssistContext,
    snapshots: ContextSnapshotBuilder,
    queue: VecDeque<String>,
    repository: Option<Arc<dyn HistoryRepository>>,
    profile: String,
    cancel_requested: bool,
}

impl Assistant {
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    /// Queue a free-text query. Picked up on the next tick that starts in
    /// `Idle`; queries never interrupt a running cycle.
    ///
    /// # Errors
    ///
    /// [`AssistantError::EmptyQuery`] if `text` is blank.
    pub fn submit_query(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyQuery);
        }
        tracing::debug!(queued = self.queue.len() + 1, "query submitted");
        self.queue.push_back(text.to_string());
        Ok(())
    }

    /// Record a user activity. It is stamped with the current tick.
    pub fn record_activity(&mut self, kind: ActivityKind, subject: impl Into<String>) {
        self.snapshots.record(ActivityEvent {
            tick: self.context.tick,
            kind,
            subject: subject.into(),
        });
    }

    /// Drop the in-flight cycle at the next tick boundary. Queued queries are
    /// kept. A classifier answer that arrives afterwards is discarded.
    pub fn cancel(&mut self) {
        tracing::debug!(state = %self.machine.current(), "cancel requested");
        self.cancel_requested = true;
    }

    /// Run exactly one tick.
    ///
    /// # Panics
    ///
    /// Panics on an invariant violation when `strict_invariants` is set.
    pub fn update(&mut self) -> TickReport {
        self.context.tick += 1;
        let tick = self.context.tick;

        self.begin_tick();

        let query_pending = self.context.cycle.input.is_some()
            || self.context.interpreter.is_in_flight()
            || !self.queue.is_empty();
        self.context.snapshot = self.snapshots.build(
            tick,
            self.context.config.domain,
            &self.context.learning,
            query_pending,
        );
        self.context.state = self.machine.current();

        let status = self.tree.tick(&mut self.context);
        tracing::trace!(tick, state = %self.context.state, ?status, "tick");

        self.end_tick();

        TickReport {
            tick,
            status,
            state: self.machine.current(),
        }
    }

    /// Tick until the assistant is idle with nothing queued, or `max_ticks`
    /// have run. Always runs at least one tick.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> Vec<TickReport> {
        let mut reports = Vec::new();
        for _ in 0..max_ticks.max(1) {
            let report = self.update();
            reports.push(report);
            if !self.is_busy() {
                break;
            }
        }
        reports
    }

    /// `true` while a cycle is running or a query is queued.
    pub fn is_busy(&self) -> bool {
        self.machine.current() != AssistantState::Idle || !self.queue.is_empty()
    }

    pub fn state(&self) -> AssistantState {
        self.machine.current()
    }

    pub fn tick(&self) -> u64 {
        self.context.tick
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.context.config
    }

    pub fn subscribe_errors(&self) -> broadcast::Receiver<ErrorRecord> {
        self.context.errors.subscribe()
    }

    pub fn learning(&self) -> &LearningTracker {
        &self.context.learning
    }

    /// Last complexity target handed to the UI.
    pub fn complexity(&self) -> Option<ComplexityTarget> {
        self.context.complexity.current()
    }

    pub fn preferences(&self) -> &UserPreferences {
        self.context.learning.preferences()
    }

    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.context.learning.set_preferences(preferences);
    }

    /// Persist the learning history for this assistant's profile.
    ///
    /// # Errors
    ///
    /// - [`AssistantError::MissingCollaborator`] without a repository
    /// - [`AssistantError::Repository`] if the save failed; the failure is
    ///   also published on the error channel
    pub fn save_state(&self) -> Result<()> {
        let repository = self.repository()?;
        repository
            .save(&self.profile, &self.context.learning.snapshot())
            .map_err(|error| self.persistence_failed(error))?;
        tracing::info!(
            profile = %self.profile,
            interactions = self.context.learning.history().len(),
            "learning history saved"
        );
        Ok(())
    }

    /// Replace the learning history with the stored one. Returns `false` if
    /// the profile has never been saved.
    ///
    /// # Errors
    ///
    /// Same as [`Assistant::save_state`].
    pub fn load_state(&mut self) -> Result<bool> {
        let repository = self.repository()?;
        let snapshot = repository
            .load(&self.profile)
            .map_err(|error| self.persistence_failed(error))?;

        let Some(snapshot) = snapshot else {
            tracing::debug!(profile = %self.profile, "no saved learning history");
            return Ok(false);
        };
        tracing::info!(
            profile = %self.profile,
            interactions = snapshot.history.len(),
            milestones = snapshot.milestones.len(),
            "learning history loaded"
        );
        self.context.learning = LearningTracker::restore(snapshot);
        Ok(true)
    }

    fn repository(&self) -> Result<Arc<dyn HistoryRepository>> {
        self.repository
            .clone()
            .ok_or(AssistantError::MissingCollaborator(
                Collaborator::HistoryRepository,
            ))
    }

    fn persistence_failed(&self, error: RepositoryError) -> AssistantError {
        self.context.errors.collaborator_unavailable(
            self.context.tick,
            Collaborator::HistoryRepository,
            &CollaboratorError::Persistence(error.to_string()),
        );
        AssistantError::Repository(error)
    }

    fn begin_tick(&mut self) {
        if std::mem::take(&mut self.cancel_requested) {
            if self.context.interpreter.cancel() {
                tracing::info!(tick = self.context.tick, "in-flight query cancelled");
            }
            self.reset();
        }

        if self.machine.current() == AssistantState::Idle
            && let Some(text) = self.queue.pop_front()
        {
            self.context.cycle = Cycle {
                input: Some(text),
                ..Default::default()
            };
            self.apply(AssistantState::ProcessingQuery);
        }
    }

    fn end_tick(&mut self) {
        if let Some(message) = self.context.take_violation() {
            self.invariant_violated(message);
            return;
        }
        if let Some(next) = self.context.take_transition() {
            self.apply(next);
        }
    }

    fn apply(&mut self, next: AssistantState) {
        if let Err(illegal) = self.machine.transition(next) {
            self.invariant_violated(illegal.to_string());
        }
    }

    fn invariant_violated(&mut self, message: String) {
        if self.context.config.strict_invariants {
            panic!(
                "invariant violated at tick {}: {message}",
                self.context.tick
            );
        }
        self.context
            .errors
            .invariant_violation(self.context.tick, message);
        self.reset();
    }

    /// Return to a clean `Idle`: nothing in flight, empty cycle, tree rewound.
    fn reset(&mut self) {
        self.context.interpreter.cancel();
        self.context.clear_cycle();
        self.context.take_transition();
        self.context.opportunities.clear();
        self.machine.force_idle();
        self.tree.reset();
    }
}

/// Builder for [`Assistant`].
///
/// Only the NLP models are required. Everything else has a default.
pub struct AssistantBuilder {
    config: AssistantConfig,
    models: Option<NlpModels>,
    analyzer: Arc<dyn ContextAnalyzer>,
    ui: Arc<dyn UiSink>,
    model_updater: Arc<dyn ModelUpdater>,
    repository: Option<Arc<dyn HistoryRepository>>,
    knowledge: Option<KnowledgeBase>,
    detectors: Option<Vec<Box<dyn OpportunityDetector>>>,
    tree: Option<AssistTree>,
    profile: String,
}

impl AssistantBuilder {
    fn new() -> Self {
        Self {
            config: AssistantConfig::default(),
            models: None,
            analyzer: Arc::new(HeuristicContextAnalyzer),
            ui: Arc::new(NullUi),
            model_updater: Arc::new(NoopModelUpdater),
            repository: None,
            knowledge: None,
            detectors: None,
            tree: None,
            profile: DEFAULT_PROFILE.to_string(),
        }
    }

    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required language models. Clones share the loaded models.
    pub fn models(mut self, models: NlpModels) -> Self {
        self.models = Some(models);
        self
    }

    pub fn analyzer(mut self, analyzer: impl ContextAnalyzer + 'static) -> Self {
        self.analyzer = Arc::new(analyzer);
        self
    }

    pub fn ui(mut self, ui: Arc<dyn UiSink>) -> Self {
        self.ui = ui;
        self
    }

    pub fn model_updater(mut self, updater: Arc<dyn ModelUpdater>) -> Self {
        self.model_updater = updater;
        self
    }

    pub fn repository(mut self, repository: Arc<dyn HistoryRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Profile the learning history is saved under.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Replace the built-in knowledge for the configured domain.
    pub fn knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Replace the built-in opportunity detectors.
    pub fn detectors(mut self, detectors: Vec<Box<dyn OpportunityDetector>>) -> Self {
        self.detectors = Some(detectors);
        self
    }

    /// Replace the built-in decision tree.
    pub fn tree(mut self, tree: AssistTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// # Errors
    ///
    /// - [`AssistantError::Config`] if the configuration is invalid
    /// - [`AssistantError::Repository`] if the profile name is not a valid
    ///   file stem
    /// - [`AssistantError::MissingCollaborator`] without NLP models
    pub fn build(self) -> Result<Assistant> {
        let config = self.config;
        config.validate()?;
        validate_profile(&self.profile)?;
        let models = self
            .models
            .ok_or(AssistantError::MissingCollaborator(
                Collaborator::IntentClassifier,
            ))?;

        let detectors = self
            .detectors
            .unwrap_or_else(|| default_detectors(config.idle_suggestion_after));
        let opportunities =
            OpportunityAnalyzer::new(detectors, config.relevance_floor, config.relevance_epsilon);
        let knowledge = self
            .knowledge
            .unwrap_or_else(|| KnowledgeBase::for_domain(config.domain));
        let tree = self
            .tree
            .unwrap_or_else(|| assistant_tree(config.suggestion_cooldown));
        let snapshots = ContextSnapshotBuilder::new(
            self.analyzer,
            config.activity_window,
            config.activity_horizon,
        );
        let errors = ErrorChannel::new(config.error_buffer_size);

        tracing::info!(
            domain = %config.domain,
            confidence_threshold = config.confidence_threshold,
            relevance_floor = config.relevance_floor,
            strict_invariants = config.strict_invariants,
            knowledge = %knowledge.domain(),
            "assistant created"
        );

        let context = AssistContext::new(
            config,
            QueryInterpreter::new(&models),
            opportunities,
            LearningTracker::new(),
            knowledge,
            self.ui,
            self.model_updater,
            errors,
        );

        Ok(Assistant {
            tree,
            machine: StateMachine::new(),
            context,
            snapshots,
            queue: VecDeque::new(),
            repository: self.repository,
            profile: self.profile,
            cancel_requested: false,
        })
    }
}
