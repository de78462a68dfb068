//! Side error channel.
//!
//! Collaborator failures and invariant violations never travel through
//! behavior tree statuses. They are published here for observability and
//! logged through `tracing`.

use tokio::sync::broadcast;

use crate::error::{Collaborator, CollaboratorError};

/// Classification of a reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// An NLP, model or persistence call failed. Recoverable.
    CollaboratorUnavailable,
    /// A programming or integration error was detected.
    InvariantViolation,
}

/// One entry on the error channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub tick: u64,
    pub kind: ErrorKind,
    pub collaborator: Option<Collaborator>,
    pub message: String,
}

/// Broadcast channel carrying [`ErrorRecord`]s to any number of observers.
#[derive(Clone)]
pub struct ErrorChannel {
    tx: broadcast::Sender<ErrorRecord>,
}

impl ErrorChannel {
    /// Creates a channel that buffers up to `capacity` records per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to records published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ErrorRecord> {
        self.tx.subscribe()
    }

    /// Report a failed collaborator call.
    pub fn collaborator_unavailable(
        &self,
        tick: u64,
        collaborator: Collaborator,
        error: &CollaboratorError,
    ) {
        tracing::warn!(tick, %collaborator, %error, "collaborator unavailable");
        self.publish(ErrorRecord {
            tick,
            kind: ErrorKind::CollaboratorUnavailable,
            collaborator: Some(collaborator),
            message: error.to_string(),
        });
    }

    /// Report a broken invariant.
    pub fn invariant_violation(&self, tick: u64, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(tick, %message, "invariant violation");
        self.publish(ErrorRecord {
            tick,
            kind: ErrorKind::InvariantViolation,
            collaborator: None,
            message,
        });
    }

    fn publish(&self, record: ErrorRecord) {
        if self.tx.send(record).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("No subscribers for error channel");
        }
    }
}

impl Default for ErrorChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_records() {
        let channel = ErrorChannel::new(4);
        let mut rx = channel.subscribe();

        channel.collaborator_unavailable(
            3,
            Collaborator::IntentClassifier,
            &CollaboratorError::ModelUnavailable("offline".into()),
        );

        let record = rx.try_recv().unwrap();
        assert_eq!(record.tick, 3);
        assert_eq!(record.kind, ErrorKind::CollaboratorUnavailable);
        assert_eq!(record.collaborator, Some(Collaborator::IntentClassifier));
        assert_eq!(record.message, "model unavailable: offline");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let channel = ErrorChannel::new(4);
        channel.invariant_violation(1, "nobody listening");
    }
}
