//! Query interpreter.
//!
//! Turns raw query text into a [`QueryResult`] by delegating to the NLP
//! collaborators. At most one interpretation is in flight at any time.

use std::sync::Arc;

use crate::error::{AssistantError, Collaborator, CollaboratorError, Result};
use crate::nlp::{Classification, EntityExtractor, IntentClassifier, NlpModels, Pending};
use crate::snapshot::ContextSnapshot;
use crate::types::QueryResult;

/// Outcome of polling the in-flight interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// The classifier has not answered yet.
    Pending,
    Ready(QueryResult),
    Failed {
        collaborator: Collaborator,
        error: CollaboratorError,
    },
}

struct InFlight {
    generation: u64,
    text: String,
    context: String,
    classification: Pending<Classification>,
}

pub struct QueryInterpreter {
    classifier: Arc<dyn IntentClassifier>,
    extractor: Arc<dyn EntityExtractor>,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl QueryInterpreter {
    pub fn new(models: &NlpModels) -> Self {
        Self {
            classifier: Arc::clone(&models.classifier),
            extractor: Arc::clone(&models.extractor),
            in_flight: None,
            generation: 0,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start interpreting `text`.
    ///
    /// # Errors
    ///
    /// - [`AssistantError::EmptyQuery`] for blank input
    /// - [`AssistantError::InvariantViolation`] if an interpretation is
    ///   already in flight
    pub fn begin(&mut self, text: &str, snapshot: &ContextSnapshot) -> Result<()> {
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyQuery);
        }
        if let Some(in_flight) = &self.in_flight {
            return Err(AssistantError::InvariantViolation(format!(
                "query interpretation #{} still in flight",
                in_flight.generation
            )));
        }

        self.generation += 1;
        tracing::debug!(generation = self.generation, "query interpretation started");
        self.in_flight = Some(InFlight {
            generation: self.generation,
            text: text.to_string(),
            context: snapshot.describe(),
            classification: self.classifier.classify(text, snapshot),
        });
        Ok(())
    }

    /// Check on the in-flight interpretation without blocking.
    ///
    /// Returns `None` when nothing is in flight. Any settled outcome clears
    /// the in-flight slot.
    pub fn poll(&mut self) -> Option<Interpretation> {
        let in_flight = self.in_flight.as_mut()?;
        let classification = match in_flight.classification.poll() {
            None => return Some(Interpretation::Pending),
            Some(result) => result,
        };

        let in_flight = self.in_flight.take()?;
        let classification = match classification {
            Ok(classification) => classification,
            Err(error) => {
                return Some(Interpretation::Failed {
                    collaborator: Collaborator::IntentClassifier,
                    error,
                });
            }
        };

        let entities = match self.extractor.extract(&in_flight.text) {
            Ok(entities) => entities,
            Err(error) => {
                return Some(Interpretation::Failed {
                    collaborator: Collaborator::EntityExtractor,
                    error,
                });
            }
        };

        tracing::debug!(
            generation = in_flight.generation,
            intent = %classification.intent,
            confidence = classification.confidence,
            "query interpreted"
        );

        Some(Interpretation::Ready(QueryResult {
            intent: classification.intent,
            confidence: classification.confidence.clamp(0.0, 1.0),
            entities,
            context: in_flight.context,
        }))
    }

    /// Discard the in-flight interpretation. A late collaborator answer is
    /// dropped on arrival. Returns `true` if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                tracing::debug!(generation = in_flight.generation, "query interpretation cancelled");
                true
            }
            None => false,
        }
    }
}
