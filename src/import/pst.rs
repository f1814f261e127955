//! Import from Microsoft PST mailboxes.
//!
//! Extraction itself is delegated to the external `pffexport` utility;
//! this module walks its output tree and converts each exported message
//! into a canonical record.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use walkdir::WalkDir;

use crate::error::{MailscrubError, Result};
use crate::message::{
    is_html, CanonicalMessage, MessageHeaders, CONTENT_TYPE_HTML, CONTENT_TYPE_PLAIN, DEFAULT_FROM,
    DEFAULT_TO,
};

/// Folders skipped during conversion; only inbox-like content imports.
const IGNORE_DIRS: &[&str] = &[
    "/Sent Items/",
    "/Recoverable Items/",
    "/Junk Email/",
    "/Attachments/",
];

/// Import every message from a PST file.
pub fn import_pst(pst_path: &Path) -> Result<Vec<CanonicalMessage>> {
    let scratch = tempfile::tempdir()?;
    let target = scratch.path().join("pst");
    run_pffexport(pst_path, &target)?;

    // pffexport appends `.export` to its target name
    let export_root = scratch.path().join("pst.export");
    let message_dirs = find_message_dirs(&export_root);
    tracing::info!(count = message_dirs.len(), "converting extracted messages");

    let mut messages = Vec::with_capacity(message_dirs.len());
    for dir in message_dirs {
        match read_message_dir(&dir) {
            Ok(message) => messages.push(message),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable message");
            }
        }
    }
    Ok(messages)
}

fn run_pffexport(pst: &Path, target: &Path) -> Result<()> {
    tracing::info!(file = %pst.display(), "extracting mailbox");
    let output = Command::new("pffexport")
        .arg("-q")
        .arg("-t")
        .arg(target)
        .arg(pst)
        .output()
        .map_err(|e| MailscrubError::Extraction {
            reason: format!("failed to run pffexport: {e}"),
        })?;
    if !output.status.success() {
        return Err(MailscrubError::Extraction {
            reason: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Message directories are named `Message<N>` and must carry an
/// `InternetHeaders.txt` plus an HTML or plain-text body file.
fn find_message_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        let path_str = path.to_string_lossy();
        if IGNORE_DIRS.iter().any(|skip| path_str.contains(skip)) {
            continue;
        }
        if !entry.file_name().to_string_lossy().starts_with("Message") {
            continue;
        }
        if path.join("InternetHeaders.txt").is_file()
            && (path.join("Message.html").is_file() || path.join("Message.txt").is_file())
        {
            dirs.push(path.to_path_buf());
        }
    }
    dirs.sort();
    dirs
}

fn read_message_dir(dir: &Path) -> Result<CanonicalMessage> {
    let headers_raw = read_lossy(&dir.join("InternetHeaders.txt"))?;
    let headers = parse_header_block(&headers_raw);

    let html_path = dir.join("Message.html");
    let body = if html_path.is_file() {
        read_lossy(&html_path)?
    } else {
        read_lossy(&dir.join("Message.txt"))?
    };

    Ok(build_message(&headers, &body))
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse an exported RFC 822 header block: `Name: value` lines with
/// whitespace continuation, keys lowercased, last duplicate wins.
fn parse_header_block(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    let mut current: Option<(String, String)> = None;

    for line in raw.lines() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = current.as_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            if let Some((k, v)) = current.take() {
                headers.insert(k, v);
            }
            current = Some((key.trim().to_lowercase(), value.trim().to_string()));
        }
    }
    if let Some((k, v)) = current.take() {
        headers.insert(k, v);
    }
    headers
}

fn build_message(headers: &HashMap<String, String>, body: &str) -> CanonicalMessage {
    let now = Utc::now();
    let message_id = headers
        .get("message-id")
        .map(|v| v.trim_matches(&['\r', '\n', ' '][..]).to_string())
        .unwrap_or_else(|| format!("<{}_pst_missing_message_id>", now.timestamp()));
    let sender = headers
        .get("from")
        .cloned()
        .unwrap_or_else(|| DEFAULT_FROM.to_string());
    let recipient = headers
        .get("to")
        .cloned()
        .unwrap_or_else(|| DEFAULT_TO.to_string());
    let cc = headers.get("cc").cloned().unwrap_or_default();
    let date = headers
        .get("date")
        .cloned()
        .unwrap_or_else(|| now.to_rfc3339());
    let subject = headers.get("subject").cloned().unwrap_or_else(|| "-".to_string());

    let (plain, html, content_type) = if is_html(body) {
        (String::new(), body.to_string(), CONTENT_TYPE_HTML)
    } else {
        (body.to_string(), String::new(), CONTENT_TYPE_PLAIN)
    };

    CanonicalMessage {
        headers: MessageHeaders {
            from: sender.clone(),
            sender,
            date,
            to: recipient,
            cc: Some(cc),
            message_id,
            subject,
            content_type: content_type.to_string(),
        },
        envelope: serde_json::Map::new(),
        plain,
        html,
        attachments: Vec::new(),
    }
}
