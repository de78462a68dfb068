//! Domain knowledge used to turn interpreted queries into answers.

use std::collections::HashMap;

use crate::types::{AppDomain, AssistanceOpportunity, QueryResult, Verbosity};
use crate::ui::{AssistanceResponse, ResponseSource};

/// Placeholder replaced by the extracted entities in answer templates.
const ENTITIES: &str = "{entities}";

#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    /// Answer text. May contain `{entities}`.
    pub answer: String,
    /// Extra detail shown in detailed verbosity.
    pub detail: Option<String>,
    pub resources: Vec<String>,
}

impl KnowledgeEntry {
    pub fn new(answer: &str, detail: Option<&str>, resources: &[&str]) -> Self {
        Self {
            answer: answer.to_string(),
            detail: detail.map(str::to_string),
            resources: resources.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Intent-to-answer table for one application domain.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    domain: AppDomain,
    entries: HashMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Empty knowledge base. Every answer falls back to the generic text.
    pub fn empty(domain: AppDomain) -> Self {
        Self {
            domain,
            entries: HashMap::new(),
        }
    }

    /// Built-in entries for `domain`.
    pub fn for_domain(domain: AppDomain) -> Self {
        let mut kb = Self::empty(domain);
        let shared = [(
            "undo_history",
            KnowledgeEntry::new(
                "Open the history panel to step back to any earlier state.",
                Some("Ctrl+Z undoes one step, Ctrl+Shift+Z redoes."),
                &["docs/history"],
            ),
        )];
        let specific: Vec<(&str, KnowledgeEntry)> = match domain {
            AppDomain::Game | AppDomain::General => vec![
                (
                    "add_physics_component",
                    KnowledgeEntry::new(
                        "Select the object, then Add Component > Physics and pick a {entities}.",
                        Some("Colliders define the shape; add a rigidbody to let physics move it."),
                        &["docs/game/physics/colliders", "docs/game/physics/rigidbodies"],
                    ),
                ),
                (
                    "setup_lighting",
                    KnowledgeEntry::new(
                        "Add a light from Create > Light and adjust its {entities} in the inspector.",
                        Some("Bake static lights for performance; keep dynamic lights few."),
                        &["docs/game/lighting"],
                    ),
                ),
                (
                    "write_script",
                    KnowledgeEntry::new(
                        "Attach a new script component and open it in your editor.",
                        None,
                        &["docs/game/scripting"],
                    ),
                ),
            ],
            AppDomain::Cad => vec![
                (
                    "extrude_profile",
                    KnowledgeEntry::new(
                        "Close the sketch, select the profile and use Extrude (E).",
                        Some("A profile must be a closed loop to extrude."),
                        &["docs/cad/features/extrude"],
                    ),
                ),
                (
                    "add_constraint",
                    KnowledgeEntry::new(
                        "Pick the entities in the sketch and choose a {entities} from the Constraints menu.",
                        None,
                        &["docs/cad/sketch/constraints"],
                    ),
                ),
            ],
            AppDomain::Animation => vec![
                (
                    "set_keyframe",
                    KnowledgeEntry::new(
                        "Move to the frame on the timeline and press I to insert a keyframe.",
                        Some("Change interpolation from the curve editor's Key menu."),
                        &["docs/animation/keyframes"],
                    ),
                ),
                (
                    "rig_character",
                    KnowledgeEntry::new(
                        "Add an armature, place the {entities}, then parent the mesh with automatic weights.",
                        None,
                        &["docs/animation/rigging"],
                    ),
                ),
            ],
        };

        for (intent, entry) in shared.into_iter().chain(specific) {
            kb.insert(intent, entry);
        }
        kb
    }

    pub fn domain(&self) -> AppDomain {
        self.domain
    }

    pub fn insert(&mut self, intent: &str, entry: KnowledgeEntry) {
        self.entries.insert(intent.to_string(), entry);
    }

    pub fn get(&self, intent: &str) -> Option<&KnowledgeEntry> {
        self.entries.get(intent)
    }

    /// Compose the answer for an interpreted query. Never empty.
    pub fn answer(&self, result: &QueryResult, verbosity: Verbosity) -> AssistanceResponse {
        let (message, resources) = match self.entries.get(&result.intent) {
            Some(entry) => {
                let entities = if result.entities.is_empty() {
                    "component".to_string()
                } else {
                    result.entities.join(", ")
                };
                let mut message = entry.answer.replace(ENTITIES, &entities);
                if verbosity == Verbosity::Detailed
                    && let Some(detail) = &entry.detail
                {
                    message.push(' ');
                    message.push_str(detail);
                }
                (message, entry.resources.clone())
            }
            None => (
                format!(
                    "Here is where to start with {}.",
                    result.intent.replace('_', " ")
                ),
                vec![format!("docs/search?q={}", result.intent)],
            ),
        };

        AssistanceResponse {
            source: ResponseSource::Query {
                intent: result.intent.clone(),
            },
            message,
            resources,
            follow_up: None,
        }
    }

    /// Wrap a proactive opportunity as a response.
    pub fn suggestion(&self, opportunity: &AssistanceOpportunity) -> AssistanceResponse {
        AssistanceResponse {
            source: ResponseSource::Suggestion {
                kind: opportunity.kind.clone(),
            },
            message: opportunity.suggestion.clone(),
            resources: opportunity.resources.clone(),
            follow_up: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(intent: &str, entities: &[&str]) -> QueryResult {
        QueryResult {
            intent: intent.to_string(),
            confidence: 0.8,
            entities: entities.iter().map(|e| e.to_string()).collect(),
            context: String::new(),
        }
    }

    #[test]
    fn known_intent_fills_entities() {
        let kb = KnowledgeBase::for_domain(AppDomain::Game);
        let response = kb.answer(&query("add_physics_component", &["collider"]), Verbosity::Brief);

        assert_eq!(
            response.message,
            "Select the object, then Add Component > Physics and pick a collider."
        );
        assert_eq!(response.resources.len(), 2);
        assert_eq!(
            response.source,
            ResponseSource::Query {
                intent: "add_physics_component".into()
            }
        );
    }

    #[test]
    fn detailed_verbosity_appends_detail() {
        let kb = KnowledgeBase::for_domain(AppDomain::Animation);
        let response = kb.answer(&query("set_keyframe", &[]), Verbosity::Detailed);
        assert!(response.message.ends_with("curve editor's Key menu."));
    }

    #[test]
    fn unknown_intent_still_answers() {
        let kb = KnowledgeBase::for_domain(AppDomain::Cad);
        let response = kb.answer(&query("export_mesh", &[]), Verbosity::Brief);
        assert_eq!(response.message, "Here is where to start with export mesh.");
        assert!(!response.resources.is_empty());
    }

    #[test]
    fn domains_do_not_share_specific_entries() {
        let cad = KnowledgeBase::for_domain(AppDomain::Cad);
        assert!(cad.get("extrude_profile").is_some());
        assert!(cad.get("add_physics_component").is_none());
        assert!(cad.get("undo_history").is_some());
    }
}
