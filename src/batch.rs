//! Batch redaction: N blocking workers pull record files from a shared
//! queue, scrub each through the shared engine, and write the result
//! under the same filename in the output directory.
//!
//! One bad record never aborts the batch; it is logged and counted. The
//! engine itself is fail-closed per value, so scrub failures degrade
//! fields to empty strings rather than surfacing here.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{MailscrubError, Result};
use crate::export::list_message_files;
use crate::scrub::ScrubEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
}

pub async fn redact_dir(
    engine: Arc<ScrubEngine>,
    input_dir: &Path,
    output_dir: &Path,
    workers: usize,
) -> Result<BatchReport> {
    fs::create_dir_all(output_dir)?;
    let files: VecDeque<PathBuf> = list_message_files(input_dir)?.into();
    let total = files.len();
    let workers = workers.max(1);
    tracing::info!(records = total, workers, "starting batch redaction");

    let queue = Arc::new(Mutex::new(files));
    let processed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let queue = Arc::clone(&queue);
        let engine = Arc::clone(&engine);
        let output_dir = output_dir.to_path_buf();
        let processed = Arc::clone(&processed);
        let failed = Arc::clone(&failed);
        handles.push(tokio::task::spawn_blocking(move || loop {
            let next = queue.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
            let Some(path) = next else { break };
            match redact_file(&engine, &path, &output_dir) {
                Ok(()) => {
                    processed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "record failed, continuing");
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.await.map_err(|e| MailscrubError::Worker {
            reason: e.to_string(),
        })?;
    }

    let report = BatchReport {
        processed: processed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    };
    tracing::info!(
        processed = report.processed,
        failed = report.failed,
        "batch redaction complete"
    );
    Ok(report)
}

/// Scrub a single record file into the output directory, keeping its
/// filename. A decode failure here is an input-shape error for this one
/// record.
pub fn redact_file(engine: &ScrubEngine, path: &Path, output_dir: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)?;
    let mut record: Value = serde_json::from_str(&raw)?;
    engine.scrub_record(&mut record);

    let file_name = path.file_name().ok_or_else(|| MailscrubError::Import {
        reason: format!("record path has no file name: {}", path.display()),
    })?;
    fs::write(
        output_dir.join(file_name),
        serde_json::to_string_pretty(&record)?,
    )?;
    Ok(())
}
