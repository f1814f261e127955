//! Bulk import: convert source archives into canonical message records.

pub mod pst;
pub mod spreadsheet;

use std::collections::HashMap;
use std::path::Path;

use crate::error::{MailscrubError, Result};
use crate::message::CanonicalMessage;

/// Canonical fields a mapping may remap to source columns.
pub const MAPPABLE_FIELDS: &[&str] = &["unique_id", "subject", "body", "date", "to", "from", "cc"];

/// Canonical field name -> source column names; the first mapped column
/// with a non-empty value wins. Unmapped fields fall back to the column
/// of the same name.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    columns: HashMap<String, Vec<String>>,
}

impl FieldMapping {
    /// Parse `-m field=column[,column...]` CLI arguments.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut columns = HashMap::new();
        for item in args {
            let Some((field, sources)) = item.split_once('=') else {
                return Err(MailscrubError::Import {
                    reason: format!("mapping '{item}' is not field=column[,column...]"),
                });
            };
            let field = field.trim().to_lowercase();
            if !MAPPABLE_FIELDS.contains(&field.as_str()) {
                return Err(MailscrubError::Import {
                    reason: format!("unknown mapping field '{field}'"),
                });
            }
            columns.insert(
                field,
                sources
                    .split(',')
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect(),
            );
        }
        Ok(Self { columns })
    }

    /// Source columns for a canonical field; identity when unmapped.
    pub fn sources<'a>(&'a self, field: &'a str) -> Vec<&'a str> {
        match self.columns.get(field) {
            Some(cols) => cols.iter().map(|s| s.as_str()).collect(),
            None => vec![field],
        }
    }
}

/// Dispatch on file extension: `.pst` mailboxes go through the external
/// extractor, `.csv` through the tabular reader.
pub fn import_file(path: &Path, mapping: &FieldMapping) -> Result<Vec<CanonicalMessage>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "pst" => pst::import_pst(path),
        "csv" => spreadsheet::import_csv(path, mapping),
        other => Err(MailscrubError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_parses_and_resolves() {
        let mapping =
            FieldMapping::parse(&["from=sender_email,reply_to".into(), "body=content".into()])
                .unwrap();
        assert_eq!(mapping.sources("from"), vec!["sender_email", "reply_to"]);
        assert_eq!(mapping.sources("body"), vec!["content"]);
        // unmapped fields stay identity
        assert_eq!(mapping.sources("subject"), vec!["subject"]);
    }

    #[test]
    fn malformed_or_unknown_mappings_error() {
        assert!(FieldMapping::parse(&["no-equals-sign".into()]).is_err());
        assert!(FieldMapping::parse(&["nonsense=col".into()]).is_err());
    }

    #[test]
    fn unsupported_extension_is_typed() {
        let err = import_file(Path::new("emails.xlsx"), &FieldMapping::default()).unwrap_err();
        match err {
            MailscrubError::UnsupportedFormat { extension } => assert_eq!(extension, "xlsx"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
