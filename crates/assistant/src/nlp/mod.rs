//! Contracts for the natural-language collaborators.
//!
//! The assistant never owns a language model. It talks to an intent
//! classifier and an entity extractor through the narrow traits below.
//! Classification is asynchronous: the classifier hands back a [`Pending`]
//! that the query leaf polls once per tick without blocking.
//!
//! Models that are loaded once per process live in an [`NlpModels`] handle,
//! created by the host before any assistant and shared between instances.

mod keyword;

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::CollaboratorError;
use crate::snapshot::ContextSnapshot;

pub use keyword::{IntentRule, KeywordClassifier, KeywordEntityExtractor};

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Raw classifier output.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: String,
    pub confidence: f32,
}

/// Maps query text to an intent label and a confidence.
pub trait IntentClassifier: Send + Sync {
    /// Start classifying `text`. Must return immediately.
    fn classify(&self, text: &str, context: &ContextSnapshot) -> Pending<Classification>;
}

/// Pulls entity mentions out of query text, in order of appearance.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> CollaboratorResult<Vec<String>>;
}

/// A collaborator result that may not have arrived yet.
pub struct Pending<T> {
    rx: oneshot::Receiver<CollaboratorResult<T>>,
}

/// Completes a [`Pending`] from whichever thread the collaborator runs on.
pub struct Resolver<T> {
    tx: oneshot::Sender<CollaboratorResult<T>>,
}

impl<T> Pending<T> {
    /// An already-settled result.
    pub fn ready(result: CollaboratorResult<T>) -> Self {
        let (resolver, pending) = Self::channel();
        resolver.resolve(result);
        pending
    }

    /// A result that will be delivered later through the returned [`Resolver`].
    pub fn channel() -> (Resolver<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (Resolver { tx }, Self { rx })
    }

    /// Check for the result without blocking.
    ///
    /// Returns `None` while the collaborator is still working. A resolver that
    /// was dropped without answering reads as `ModelUnavailable`.
    pub fn poll(&mut self) -> Option<CollaboratorResult<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(CollaboratorError::ModelUnavailable(
                "collaborator dropped the request".to_string(),
            ))),
        }
    }
}

impl<T> Resolver<T> {
    /// Deliver the result. Silently discarded if the request was cancelled.
    pub fn resolve(self, result: CollaboratorResult<T>) {
        if self.tx.send(result).is_err() {
            tracing::debug!("collaborator result discarded: request no longer pending");
        }
    }
}

/// Process-wide language models shared by every assistant instance.
///
/// Created explicitly by the host before building assistants and torn down
/// when the last clone is dropped.
#[derive(Clone)]
pub struct NlpModels {
    pub classifier: Arc<dyn IntentClassifier>,
    pub extractor: Arc<dyn EntityExtractor>,
}

impl NlpModels {
    pub fn new(
        classifier: impl IntentClassifier + 'static,
        extractor: impl EntityExtractor + 'static,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            extractor: Arc::new(extractor),
        }
    }

    /// Keyword-rule models covering the built-in intents.
    pub fn keyword() -> Self {
        let classifier = KeywordClassifier::default();
        let extractor = KeywordEntityExtractor::from_rules(classifier.rules());
        Self::new(classifier, extractor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_settles_once_resolved() {
        let (resolver, mut pending) = Pending::<u32>::channel();
        assert!(pending.poll().is_none());

        resolver.resolve(Ok(7));
        assert_eq!(pending.poll(), Some(Ok(7)));
    }

    #[test]
    fn dropped_resolver_reads_as_unavailable() {
        let (resolver, mut pending) = Pending::<u32>::channel();
        drop(resolver);

        assert!(matches!(
            pending.poll(),
            Some(Err(CollaboratorError::ModelUnavailable(_)))
        ));
    }

    #[test]
    fn resolving_a_dropped_request_is_harmless() {
        let (resolver, pending) = Pending::<u32>::channel();
        drop(pending);
        resolver.resolve(Ok(1));
    }
}
