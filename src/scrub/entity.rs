use std::collections::HashSet;

use crate::error::Result;

use super::{ScrubStage, REDACTION_TEXT};

/// A recognized entity: the exact matched text and its category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// Seam to the pretrained named-entity model. Implementations return
/// entities in detection order and must be shareable across scrub
/// workers.
pub trait EntityRecognizer: Send + Sync {
    fn entities(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Labels the entity stage redacts. Everything else the model reports
/// (quantities, ordinals, products, ...) is left alone.
pub const REDACT_LABELS: &[&str] = &["PERSON", "DATE", "LOC", "FAC", "ORG", "GPE"];

/// Normalize a model label: strip any BIO prefix, uppercase, and fold the
/// CoNLL-style `PER` tag into `PERSON`.
pub fn normalize_label(label: &str) -> String {
    let stripped = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label);
    let upper = stripped.to_ascii_uppercase();
    if upper == "PER" {
        "PERSON".to_string()
    } else {
        upper
    }
}

/// Stage 2: named-entity redaction over the regex-scrubbed text.
///
/// Replacement is literal-text based, not span based: every occurrence of
/// a kept entity's exact text is replaced, and an entity whose text was
/// already consumed by an earlier replacement simply no-ops. Redaction
/// only ever removes information.
pub struct EntityScrubber {
    recognizer: Box<dyn EntityRecognizer>,
    labels: HashSet<String>,
}

impl EntityScrubber {
    pub fn new(recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            labels: REDACT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScrubStage for EntityScrubber {
    fn scrub(&self, input: &str) -> Result<String> {
        let entities = self.recognizer.entities(input)?;
        let mut text = input.to_string();
        for entity in entities {
            // an empty literal would match at every position
            if entity.text.is_empty() {
                continue;
            }
            if !self.labels.contains(&normalize_label(&entity.label)) {
                continue;
            }
            text = text.replace(&entity.text, REDACTION_TEXT);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "entities"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Entity>);

    impl EntityRecognizer for Fixed {
        fn entities(&self, _text: &str) -> Result<Vec<Entity>> {
            Ok(self.0.clone())
        }
    }

    fn entity(text: &str, label: &str) -> Entity {
        Entity {
            text: text.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn normalizes_bio_and_conll_labels() {
        assert_eq!(normalize_label("I-PER"), "PERSON");
        assert_eq!(normalize_label("B-LOC"), "LOC");
        assert_eq!(normalize_label("PERSON"), "PERSON");
        assert_eq!(normalize_label("gpe"), "GPE");
    }

    #[test]
    fn only_allowed_labels_are_redacted() {
        let stage = EntityScrubber::new(Box::new(Fixed(vec![
            entity("John Smith", "PERSON"),
            entity("three", "CARDINAL"),
        ])));
        let out = stage.scrub("John Smith bought three apples").unwrap();
        assert_eq!(out, "[REDACTED] bought three apples");
    }

    #[test]
    fn every_occurrence_of_an_entity_is_replaced() {
        let stage = EntityScrubber::new(Box::new(Fixed(vec![entity("Louise", "PERSON")])));
        let out = stage.scrub("Louise wrote back. Thanks, Louise!").unwrap();
        assert_eq!(out, "[REDACTED] wrote back. Thanks, [REDACTED]!");
    }

    #[test]
    fn consumed_entity_text_noops() {
        // "East Street" is replaced first; the narrower "Street" entity
        // no longer finds its text.
        let stage = EntityScrubber::new(Box::new(Fixed(vec![
            entity("East Street", "FAC"),
            entity("Street", "LOC"),
        ])));
        let out = stage.scrub("corner of East Street").unwrap();
        assert_eq!(out, "corner of [REDACTED]");
    }

    #[test]
    fn empty_entity_text_is_ignored() {
        let stage = EntityScrubber::new(Box::new(Fixed(vec![entity("", "PERSON")])));
        let out = stage.scrub("nothing to see").unwrap();
        assert_eq!(out, "nothing to see");
    }
}
