use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::batch;
use crate::config::ScrubConfig;
use crate::error::{MailscrubError, Result};
use crate::scrub::rules::RuleSet;
use crate::scrub::{ScrubEngine, ScrubInput};

use super::Format;

/// Redact a directory of record files through the worker pool, or a
/// single file according to `--format`.
pub async fn run(input: &Path, out: &Path, workers: Option<usize>, format: Format) -> Result<()> {
    let config = ScrubConfig::load()?;
    let rules = config.rule_set()?;

    // Model construction is blocking and may fetch artifacts on first
    // use; a load failure aborts the command rather than proceeding
    // without the entity stage.
    let engine = tokio::task::spawn_blocking(move || build_engine(rules))
        .await
        .map_err(|e| MailscrubError::Worker {
            reason: e.to_string(),
        })??;
    let engine = Arc::new(engine);

    if input.is_dir() {
        let workers = workers.unwrap_or(config.workers);
        let report = batch::redact_dir(engine, input, out, workers).await?;
        eprintln!(
            "mailscrub: {} record(s) redacted, {} failed",
            report.processed, report.failed
        );
        return Ok(());
    }

    fs::create_dir_all(out)?;
    let raw = fs::read_to_string(input)?;
    let output = match format {
        Format::Text => engine.scrub(ScrubInput::Text(&raw)),
        Format::Json => engine.scrub(ScrubInput::Json(serde_json::from_str(&raw)?)),
        Format::Ndjson => engine.scrub(ScrubInput::NdJson(&raw)),
    };

    let file_name = input.file_name().ok_or_else(|| MailscrubError::Import {
        reason: format!("input path has no file name: {}", input.display()),
    })?;
    fs::write(out.join(file_name), output.render()?)?;
    eprintln!("mailscrub: redacted {} to {}", input.display(), out.display());
    Ok(())
}

#[cfg(feature = "ner")]
fn build_engine(rules: RuleSet) -> Result<ScrubEngine> {
    ScrubEngine::with_pretrained(rules)
}

#[cfg(not(feature = "ner"))]
fn build_engine(_rules: RuleSet) -> Result<ScrubEngine> {
    Err(MailscrubError::ModelUnavailable {
        reason: "built without the `ner` feature; no entity recognizer available".into(),
    })
}
