//! mailscrub: bulk email import and PII redaction.
//!
//! Converts legacy mailbox archives and tabular exports into canonical
//! JSON records, then strips PII through an engine that layers ordered
//! regex rules with a pretrained named-entity recognizer and walks
//! structured records recursively. Redaction is fail-closed: an internal
//! failure yields an empty value, never the original text.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod message;
pub mod scrub;

pub use error::{MailscrubError, Result};
