use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MailscrubError, Result};

/// Placeholder recipient/sender for records that arrive without one. The
/// reserved domain keeps them recognizable downstream.
pub const DEFAULT_TO: &str = "analysis@mailscrub.invalid";
pub const DEFAULT_FROM: &str = "client@mailscrub.invalid";

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=\"utf-8\"";
pub const CONTENT_TYPE_PLAIN: &str = "text/plain; charset=\"utf-8\"";

/// The canonical per-message record every import source converges on.
/// Field names and nesting are preserved bit-for-bit through the
/// redaction pass; only string leaf values change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    pub headers: MessageHeaders,
    #[serde(default)]
    pub envelope: serde_json::Map<String, Value>,
    pub plain: String,
    pub html: String,
    #[serde(default)]
    pub attachments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageHeaders {
    pub from: String,
    pub sender: String,
    pub date: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    pub message_id: String,
    pub subject: String,
    pub content_type: String,
}

impl CanonicalMessage {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Body HTML detection: paired html tags, or an explicit content-type
/// marker embedded in the body text.
pub fn is_html(body: &str) -> bool {
    (body.contains("<html") && body.contains("</html")) || body.contains("text/html")
}

/// Coerce a raw address into `name@domain` form. `Name <addr>` keeps only
/// the angle-bracketed part; bare names get the `undefined.email` domain;
/// a dot-less domain gets a `.undefined` suffix. Blank input is an error
/// the caller decides how to default.
pub fn validate_email(raw: &str) -> Result<String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(MailscrubError::MissingField {
            field: "email".into(),
        });
    }
    let addr = match (cleaned.find('<'), cleaned.rfind('>')) {
        (Some(start), Some(end)) if start < end => &cleaned[start + 1..end],
        _ => cleaned.as_str(),
    };
    let formatted = match addr.split_once('@') {
        None => format!("{addr}@undefined.email"),
        Some((name, domain)) if !domain.contains('.') => format!("{name}@{domain}.undefined"),
        Some(_) => addr.to_string(),
    };
    Ok(formatted)
}
