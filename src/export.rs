//! Staged export layout: one pretty-printed JSON file per message, named
//! by a generated UUID, inside a timestamped export directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::message::CanonicalMessage;

/// Create `base/export-YYYYMMDD-HHMMSS/`, including parents.
pub fn create_export_dir(base: &Path) -> Result<PathBuf> {
    let dir = base.join(format!("export-{}", Utc::now().format("%Y%m%d-%H%M%S")));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Persist one message under a fresh UUID filename; returns the path.
pub fn write_message(dir: &Path, message: &CanonicalMessage) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", Uuid::new_v4()));
    fs::write(&path, serde_json::to_string_pretty(message)?)?;
    Ok(path)
}

/// The `.json` record files of a directory, sorted for deterministic
/// batch order.
pub fn list_message_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();
    Ok(files)
}
