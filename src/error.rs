use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MailscrubError {
    #[error("invalid pattern for category {category}: {reason}")]
    InvalidPattern { category: String, reason: String },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("entity recognizer error: {reason}")]
    Recognizer { reason: String },

    #[error("recognizer model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("unsupported import format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("required field missing: {field}")]
    MissingField { field: String },

    #[error("import error: {reason}")]
    Import { reason: String },

    #[error("mailbox extraction failed: {reason}")]
    Extraction { reason: String },

    #[error("worker pool error: {reason}")]
    Worker { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MailscrubError>;
