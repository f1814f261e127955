//! The PII redaction engine: ordered pattern rules, then named-entity
//! redaction, applied to free text or recursively over structured
//! records. Failures never leak input: the public scrub degrades to an
//! empty value.

#[cfg(feature = "ner")]
pub mod bert;
pub mod entity;
pub mod pattern;
pub mod rules;
pub mod walker;

use serde_json::Value;

use crate::error::Result;

use self::entity::{EntityRecognizer, EntityScrubber};
use self::pattern::PatternScrubber;
use self::rules::RuleSet;

/// The fixed marker substituted for every detected PII span, regardless
/// of category. The bracketed form never re-matches any rule.
pub const REDACTION_TEXT: &str = "[REDACTED]";

/// A single scrub layer. Layers run in sequence; each receives the
/// previous layer's output.
pub trait ScrubStage: Send + Sync {
    fn scrub(&self, input: &str) -> Result<String>;

    /// Name of this layer (for logging/debugging).
    fn name(&self) -> &str;
}

/// Input to the orchestrator, tagged by format.
pub enum ScrubInput<'a> {
    /// Bare text in, bare text out.
    Text(&'a str),
    /// One decoded structured record.
    Json(Value),
    /// Newline-delimited structured records, scrubbed independently.
    NdJson(&'a str),
}

/// Scrubbed output, same variant as the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrubOutput {
    Text(String),
    Json(Value),
    NdJson(Vec<Value>),
}

impl ScrubOutput {
    /// Serialized form for writing back out: text verbatim, a record as
    /// pretty JSON, ndjson as one compact record per line.
    pub fn render(&self) -> Result<String> {
        match self {
            ScrubOutput::Text(text) => Ok(text.clone()),
            ScrubOutput::Json(record) => Ok(serde_json::to_string_pretty(record)?),
            ScrubOutput::NdJson(records) => {
                let lines = records
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(lines.join("\n"))
            }
        }
    }
}

/// The redaction engine. Constructed once per process (the recognizer is
/// the expensive part), then shared read-only across every scrub call.
pub struct ScrubEngine {
    stages: Vec<Box<dyn ScrubStage>>,
}

impl ScrubEngine {
    pub fn new(rules: RuleSet, recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            stages: vec![
                Box::new(PatternScrubber::new(rules)),
                Box::new(EntityScrubber::new(recognizer)),
            ],
        }
    }

    /// Engine backed by the pretrained recognizer. A model load failure
    /// is fatal here: running without the entity stage would silently
    /// under-redact.
    #[cfg(feature = "ner")]
    pub fn with_pretrained(rules: RuleSet) -> Result<Self> {
        let recognizer = bert::BertRecognizer::new()?;
        Ok(Self::new(rules, Box::new(recognizer)))
    }

    /// Run all stages over a text value. Any stage failure propagates as
    /// a typed error; callers that must not fail use [`scrub_text`].
    ///
    /// [`scrub_text`]: ScrubEngine::scrub_text
    pub fn try_scrub_text(&self, input: &str) -> Result<String> {
        let mut text = input.to_string();
        for stage in &self.stages {
            text = stage.scrub(&text)?;
            tracing::trace!(stage = stage.name(), "stage complete");
        }
        Ok(text)
    }

    /// Fail-closed text scrub: on any internal failure the result is the
    /// empty string, never the original or partially redacted text.
    pub fn scrub_text(&self, input: &str) -> String {
        match self.try_scrub_text(input) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "scrub failed, emitting empty value");
                String::new()
            }
        }
    }

    /// Scrub every reachable string leaf of a record in place; shape and
    /// key set are preserved.
    pub fn scrub_record(&self, record: &mut Value) {
        walker::walk_value(record, &|text| self.scrub_text(text));
    }

    /// Format dispatch. A malformed NDJSON line degrades to `null` for
    /// that line; sibling lines are unaffected.
    pub fn scrub(&self, input: ScrubInput<'_>) -> ScrubOutput {
        match input {
            ScrubInput::Text(text) => ScrubOutput::Text(self.scrub_text(text)),
            ScrubInput::Json(mut record) => {
                self.scrub_record(&mut record);
                ScrubOutput::Json(record)
            }
            ScrubInput::NdJson(raw) => {
                let records = raw
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| match serde_json::from_str::<Value>(line) {
                        Ok(mut record) => {
                            self.scrub_record(&mut record);
                            record
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "malformed record line degraded to null");
                            Value::Null
                        }
                    })
                    .collect();
                ScrubOutput::NdJson(records)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::entity::Entity;
    use super::*;
    use crate::error::MailscrubError;
    use serde_json::json;

    struct NoEntities;

    impl EntityRecognizer for NoEntities {
        fn entities(&self, _text: &str) -> Result<Vec<Entity>> {
            Ok(Vec::new())
        }
    }

    struct Failing;

    impl EntityRecognizer for Failing {
        fn entities(&self, _text: &str) -> Result<Vec<Entity>> {
            Err(MailscrubError::Recognizer {
                reason: "inference backend gone".into(),
            })
        }
    }

    fn engine() -> ScrubEngine {
        ScrubEngine::new(RuleSet::standard(), Box::new(NoEntities))
    }

    #[test]
    fn recognizer_failure_yields_empty_text_not_input() {
        let engine = ScrubEngine::new(RuleSet::standard(), Box::new(Failing));
        let out = engine.scrub_text("jane@example.com called from 021 345 6789");
        assert_eq!(out, "");
    }

    #[test]
    fn recognizer_failure_is_typed_at_the_internal_boundary() {
        let engine = ScrubEngine::new(RuleSet::standard(), Box::new(Failing));
        assert!(engine.try_scrub_text("anything").is_err());
    }

    #[test]
    fn text_dispatch_scrubs_patterns() {
        let out = engine().scrub(ScrubInput::Text("mail jane@example.com"));
        assert_eq!(out, ScrubOutput::Text("mail [REDACTED]".into()));
    }

    #[test]
    fn ndjson_lines_are_independent() {
        let raw = "{\"plain\": \"jane@example.com\"}\nnot json\n{\"plain\": \"clean\"}";
        let ScrubOutput::NdJson(records) = engine().scrub(ScrubInput::NdJson(raw)) else {
            panic!("wrong output variant");
        };
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], json!({"plain": "[REDACTED]"}));
        assert_eq!(records[1], Value::Null);
        assert_eq!(records[2], json!({"plain": "clean"}));
    }
}
