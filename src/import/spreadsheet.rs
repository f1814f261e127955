//! Import from tabular CSV exports: one message per row, columns matched
//! case-insensitively and optionally remapped.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use csv::StringRecord;

use crate::error::{MailscrubError, Result};
use crate::message::{
    is_html, validate_email, CanonicalMessage, MessageHeaders, CONTENT_TYPE_HTML,
    CONTENT_TYPE_PLAIN, DEFAULT_FROM, DEFAULT_TO,
};

use super::FieldMapping;

/// Columns that must resolve through the mapping before any row imports.
const REQUIRED_FIELDS: &[&str] = &["unique_id", "subject", "body", "date"];

pub fn import_csv(path: &Path, mapping: &FieldMapping) -> Result<Vec<CanonicalMessage>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headings: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    check_required_columns(&headings, mapping)?;

    let index: HashMap<&str, usize> = headings
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let mut messages = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        match convert_row(&record, &index, mapping) {
            Ok(message) => messages.push(message),
            // heading row is line 1
            Err(e) => tracing::warn!(line = row + 2, error = %e, "skipping row"),
        }
    }
    tracing::info!(count = messages.len(), "rows converted");
    Ok(messages)
}

fn check_required_columns(headings: &[String], mapping: &FieldMapping) -> Result<()> {
    for field in REQUIRED_FIELDS {
        let present = mapping
            .sources(field)
            .iter()
            .any(|source| headings.iter().any(|h| h == source));
        if !present {
            return Err(MailscrubError::MissingField {
                field: (*field).to_string(),
            });
        }
    }
    Ok(())
}

/// First mapped column with a non-empty value, if any.
fn field(
    record: &StringRecord,
    index: &HashMap<&str, usize>,
    mapping: &FieldMapping,
    name: &str,
) -> Option<String> {
    for source in mapping.sources(name) {
        if let Some(&i) = index.get(source) {
            let value = record.get(i).unwrap_or("").trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn convert_row(
    record: &StringRecord,
    index: &HashMap<&str, usize>,
    mapping: &FieldMapping,
) -> Result<CanonicalMessage> {
    let unique_id = field(record, index, mapping, "unique_id").ok_or_else(|| {
        MailscrubError::MissingField {
            field: "unique_id".into(),
        }
    })?;
    let subject = field(record, index, mapping, "subject").unwrap_or_else(|| "-".to_string());
    let body = field(record, index, mapping, "body").unwrap_or_default();
    let date = field(record, index, mapping, "date").unwrap_or_else(|| Utc::now().to_rfc3339());

    let mut to_addr =
        field(record, index, mapping, "to").unwrap_or_else(|| DEFAULT_TO.to_string());
    let mut from_addr =
        field(record, index, mapping, "from").unwrap_or_else(|| DEFAULT_FROM.to_string());
    let cc_raw = field(record, index, mapping, "cc").unwrap_or_default();

    // Multiple addresses in a single column: the first `to` address is
    // kept, the rest fold into cc.
    let mut cc_list: Vec<String> = Vec::new();
    for sep in [',', ';'] {
        if to_addr.contains(sep) {
            let mut parts: Vec<String> = to_addr.split(sep).map(str::to_string).collect();
            to_addr = parts.remove(0);
            cc_list = parts;
            break;
        }
    }
    for sep in [',', ';'] {
        if cc_raw.contains(sep) {
            cc_list.extend(cc_raw.split(sep).map(str::to_string));
            break;
        }
    }
    if !cc_raw.is_empty() && !cc_raw.contains(',') && !cc_raw.contains(';') {
        cc_list.push(cc_raw);
    }

    for sep in [',', ';'] {
        if from_addr.contains(sep) {
            from_addr = from_addr.split(sep).next().unwrap_or("").to_string();
            break;
        }
    }

    let to_addr = validate_email(&to_addr)?;
    let from_addr = validate_email(&from_addr)?;
    let cc_list: Vec<String> = cc_list
        .iter()
        .filter_map(|addr| validate_email(addr).ok())
        .collect();

    // Downstream expects angle brackets on the id; strip any present so
    // re-adding them is safe.
    let message_id = format!(
        "<{}>",
        unique_id.trim_start_matches('<').trim_end_matches('>')
    );

    let (plain, html, content_type) = if is_html(&body) {
        (String::new(), body.clone(), CONTENT_TYPE_HTML)
    } else {
        (body.clone(), String::new(), CONTENT_TYPE_PLAIN)
    };

    Ok(CanonicalMessage {
        headers: MessageHeaders {
            from: from_addr.clone(),
            sender: from_addr,
            date,
            to: to_addr,
            cc: if cc_list.is_empty() {
                None
            } else {
                Some(cc_list.join(","))
            },
            message_id,
            subject,
            content_type: content_type.to_string(),
        },
        envelope: serde_json::Map::new(),
        plain,
        html,
        attachments: Vec::new(),
    })
}
