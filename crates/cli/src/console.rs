//! Terminal rendering of assistant output.

use assistant_core::{
    AssistanceResponse, ComplexityTarget, ErrorRecord, LearningMilestone, ResponseSource, UiSink,
};
use serde::Serialize;

/// Prints whatever the assistant decides to show.
pub struct ConsoleUi {
    json: bool,
}

impl ConsoleUi {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Emit one JSON object per line, tagged with `event`.
    pub fn emit_json(&self, event: &str, payload: &impl Serialize) {
        match serde_json::to_value(payload) {
            Ok(mut value) => {
                if let Some(object) = value.as_object_mut() {
                    object.insert("event".to_string(), event.into());
                }
                println!("{value}");
            }
            Err(error) => tracing::warn!(%error, event, "failed to encode output"),
        }
    }

    pub fn error(&self, record: &ErrorRecord) {
        if self.json {
            let payload = serde_json::json!({
                "tick": record.tick,
                "kind": record.kind.to_string(),
                "collaborator": record.collaborator.map(|c| c.to_string()),
                "message": record.message,
            });
            self.emit_json("error", &payload);
        } else {
            println!("  ! {} ({})", record.kind, record.message);
        }
    }
}

impl UiSink for ConsoleUi {
    fn present(&self, response: &AssistanceResponse) {
        if self.json {
            self.emit_json("response", response);
            return;
        }

        let label = match &response.source {
            ResponseSource::Query { intent } => intent.clone(),
            ResponseSource::Suggestion { kind } => format!("tip: {kind}"),
            ResponseSource::Neutral => "assistant".to_string(),
        };
        println!("[{label}] {}", response.message);
        for resource in &response.resources {
            println!("    -> {resource}");
        }
        if let Some(follow_up) = &response.follow_up {
            println!("    also: {follow_up}");
        }
    }

    fn apply_complexity(&self, target: ComplexityTarget) {
        if self.json {
            self.emit_json("complexity", &target);
        } else {
            println!("  (interface: {} {:.2})", target.level, target.score);
        }
    }

    fn milestone_reached(&self, milestone: &LearningMilestone) {
        if self.json {
            self.emit_json("milestone", milestone);
        } else {
            println!(
                "  * milestone: {} x{}",
                milestone.category, milestone.threshold
            );
        }
    }
}
