//! Keyword-rule reference collaborators.
//!
//! Good enough to drive the CLI and tests without a trained model.

use crate::nlp::{
    Classification, CollaboratorResult, EntityExtractor, IntentClassifier, Pending,
};
use crate::snapshot::ContextSnapshot;

/// Intent label reported when no rule matches.
pub const UNKNOWN_INTENT: &str = "unknown";

/// One intent and the words that signal it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentRule {
    pub intent: String,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: &str, keywords: &[&str]) -> Self {
        Self {
            intent: intent.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Scores each rule by how many of its keywords appear in the query.
///
/// Confidence is `0.4 + 0.2 * matches`, capped at `0.95`. Ties go to the
/// rule declared first.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<IntentRule>,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    fn score(&self, text: &str) -> Classification {
        let words = tokenize(text);

        let mut best: Option<(&IntentRule, usize)> = None;
        for rule in &self.rules {
            let matches = rule
                .keywords
                .iter()
                .filter(|keyword| words.iter().any(|word| word == *keyword))
                .count();
            if matches > best.map_or(0, |(_, m)| m) {
                best = Some((rule, matches));
            }
        }

        match best {
            Some((rule, matches)) => Classification {
                intent: rule.intent.clone(),
                confidence: (0.4 + 0.2 * matches as f32).min(0.95),
            },
            None => Classification {
                intent: UNKNOWN_INTENT.to_string(),
                confidence: 0.0,
            },
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(vec![
            IntentRule::new(
                "add_physics_component",
                &["collider", "rigidbody", "physics", "gravity", "collision"],
            ),
            IntentRule::new("setup_lighting", &["light", "lighting", "shadow", "shadows"]),
            IntentRule::new("write_script", &["script", "scripting", "code", "behaviour"]),
            IntentRule::new("extrude_profile", &["extrude", "extrusion", "profile", "sketch"]),
            IntentRule::new("add_constraint", &["constraint", "constrain", "dimension", "parallel"]),
            IntentRule::new("set_keyframe", &["keyframe", "key", "timeline", "interpolation"]),
            IntentRule::new("rig_character", &["rig", "bone", "bones", "skin", "skeleton"]),
            IntentRule::new("undo_history", &["undo", "redo", "history", "revert"]),
        ])
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str, _context: &ContextSnapshot) -> Pending<Classification> {
        Pending::ready(Ok(self.score(text)))
    }
}

/// Reports every known term found in the query, in order, without repeats.
#[derive(Debug, Clone, Default)]
pub struct KeywordEntityExtractor {
    vocabulary: Vec<String>,
}

impl KeywordEntityExtractor {
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self { vocabulary }
    }

    /// Use every keyword of `rules` as vocabulary.
    pub fn from_rules(rules: &[IntentRule]) -> Self {
        let mut vocabulary: Vec<String> = Vec::new();
        for keyword in rules.iter().flat_map(|rule| &rule.keywords) {
            if !vocabulary.contains(keyword) {
                vocabulary.push(keyword.clone());
            }
        }
        Self { vocabulary }
    }
}

impl EntityExtractor for KeywordEntityExtractor {
    fn extract(&self, text: &str) -> CollaboratorResult<Vec<String>> {
        let mut entities: Vec<String> = Vec::new();
        for word in tokenize(text) {
            if self.vocabulary.contains(&word) && !entities.contains(&word) {
                entities.push(word);
            }
        }
        Ok(entities)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_collider_question() {
        let classifier = KeywordClassifier::default();
        let mut pending = classifier.classify("How do I add a collider?", &ContextSnapshot::default());

        let classification = pending.poll().unwrap().unwrap();
        assert_eq!(classification.intent, "add_physics_component");
        assert!((classification.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn more_matches_raise_confidence() {
        let classifier = KeywordClassifier::default();
        let one = classifier.score("add a rigidbody");
        let three = classifier.score("rigidbody collider gravity");
        assert!(three.confidence > one.confidence);
        assert!(three.confidence <= 0.95);
    }

    #[test]
    fn unmatched_text_is_unknown() {
        let classifier = KeywordClassifier::default();
        let classification = classifier.score("what's for lunch");
        assert_eq!(classification.intent, UNKNOWN_INTENT);
        assert_eq!(classification.confidence, 0.0);
    }

    #[test]
    fn extracts_entities_in_order_without_repeats() {
        let extractor = KeywordEntityExtractor::from_rules(KeywordClassifier::default().rules());
        let entities = extractor
            .extract("Collider or rigidbody? The collider, please")
            .unwrap();
        assert_eq!(entities, vec!["collider", "rigidbody"]);
    }
}
