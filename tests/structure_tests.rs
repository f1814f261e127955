//! Structural-preservation tests: redaction over canonical records must
//! never change shape, keys, or non-string leaves.

use serde_json::{json, Value};

use mailscrub::error::{MailscrubError, Result};
use mailscrub::scrub::entity::{Entity, EntityRecognizer};
use mailscrub::scrub::rules::RuleSet;
use mailscrub::scrub::ScrubEngine;

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

fn canonical_record() -> Value {
    json!({
        "headers": {
            "from": "jane.doe@example.com",
            "sender": "jane.doe@example.com",
            "date": "2025-01-09T10:00:00",
            "to": "desk@example.com",
            "cc": "",
            "message_id": "<abc-123>",
            "subject": "account 12-1234-1234567-12",
            "content_type": "text/plain; charset=\"utf-8\""
        },
        "envelope": {"client_ref": "ref for jane.doe@example.com", "hops": 3},
        "plain": "Write to jane.doe@example.com",
        "html": "",
        "attachments": ["opaque-blob", {"name": "scan.pdf", "note": "from jane.doe@example.com"}, 42]
    })
}

/// Collect the full key-path shape of a value: object keys, array
/// lengths, and leaf types.
fn shape(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map {
                shape(entry, &format!("{prefix}/{key}"), out);
            }
        }
        Value::Array(items) => {
            out.push(format!("{prefix}[len={}]", items.len()));
            for (i, item) in items.iter().enumerate() {
                shape(item, &format!("{prefix}[{i}]"), out);
            }
        }
        Value::String(_) => out.push(format!("{prefix}:string")),
        Value::Number(_) => out.push(format!("{prefix}:number")),
        Value::Bool(_) => out.push(format!("{prefix}:bool")),
        Value::Null => out.push(format!("{prefix}:null")),
    }
}

#[test]
fn shape_is_preserved_exactly() {
    let engine = ScrubEngine::new(RuleSet::standard(), Box::new(NoEntities));
    let mut record = canonical_record();
    let mut before = Vec::new();
    shape(&record, "", &mut before);

    engine.scrub_record(&mut record);

    let mut after = Vec::new();
    shape(&record, "", &mut after);
    assert_eq!(before, after);
}

#[test]
fn string_leaves_in_objects_are_scrubbed_at_any_depth() {
    let engine = ScrubEngine::new(RuleSet::standard(), Box::new(NoEntities));
    let mut record = canonical_record();
    engine.scrub_record(&mut record);

    assert_eq!(record["headers"]["from"], "[REDACTED]");
    assert_eq!(record["headers"]["subject"], "account [REDACTED]");
    // envelope is opaque but its string leaves are reachable
    assert_eq!(record["envelope"]["client_ref"], "ref for [REDACTED]");
    assert_eq!(record["envelope"]["hops"], 3);
    assert_eq!(record["plain"], "Write to [REDACTED]");
}

#[test]
fn plain_array_elements_pass_through_but_object_elements_recurse() {
    let engine = ScrubEngine::new(RuleSet::standard(), Box::new(NoEntities));
    let mut record = canonical_record();
    engine.scrub_record(&mut record);

    let attachments = record["attachments"].as_array().unwrap();
    assert_eq!(attachments[0], "opaque-blob");
    assert_eq!(attachments[1]["note"], "from [REDACTED]");
    assert_eq!(attachments[2], 42);
}

#[test]
fn failure_empties_string_leaves_without_touching_shape() {
    let engine = ScrubEngine::new(RuleSet::standard(), Box::new(Failing));
    let mut record = canonical_record();
    let mut before = Vec::new();
    shape(&record, "", &mut before);

    engine.scrub_record(&mut record);

    let mut after = Vec::new();
    shape(&record, "", &mut after);
    assert_eq!(before, after);
    // every reachable string degraded to empty, nothing leaked
    assert_eq!(record["plain"], "");
    assert_eq!(record["headers"]["from"], "");
    assert_eq!(record["envelope"]["client_ref"], "");
    assert!(!record.to_string().contains("jane.doe"));
    // pass-through leaves are not strings reachable by the walker
    assert_eq!(record["attachments"][0], "opaque-blob");
}
