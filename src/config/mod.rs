use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MailscrubError, Result};
use crate::scrub::rules::RuleSet;

/// Top-level tool configuration, loaded from `mailscrub.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Batch worker count. Default: 4. The CLI `--workers` flag wins.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Extra (category, pattern) rules appended after the standard rule
    /// set at engine construction.
    #[serde(default)]
    pub extra_patterns: Vec<ExtraPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraPattern {
    pub category: String,
    pub pattern: String,
}

fn default_workers() -> usize {
    4
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            extra_patterns: Vec::new(),
        }
    }
}

impl ScrubConfig {
    /// Load from a YAML file. Returns the default config if the file
    /// doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| MailscrubError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `mailscrub.yml` from the working directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("mailscrub.yml"))
    }

    /// The rule set this config describes: the standard rules plus any
    /// configured extensions, appended in file order.
    pub fn rule_set(&self) -> Result<RuleSet> {
        let pairs: Vec<(&str, &str)> = self
            .extra_patterns
            .iter()
            .map(|p| (p.category.as_str(), p.pattern.as_str()))
            .collect();
        Ok(RuleSet::standard().extend(RuleSet::compile(&pairs)?))
    }
}
