pub mod extract;
pub mod redact;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Bulk email import and PII redaction.
#[derive(Debug, Parser)]
#[command(name = "mailscrub", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a PST mailbox or CSV export into canonical JSON records.
    Extract {
        /// File to process (.pst or .csv).
        file: PathBuf,

        /// Base output directory for the timestamped export.
        #[arg(short, long, default_value = "data/export")]
        out: PathBuf,

        /// Field mappings for tabular input: field=column[,column...].
        #[arg(short = 'm', long = "map")]
        map: Vec<String>,
    },

    /// Redact PII from canonical records or plain text.
    Redact {
        /// A record file or a directory of record files.
        input: PathBuf,

        /// Output directory; scrubbed files keep their filenames.
        #[arg(short, long, default_value = "redacted-emails")]
        out: PathBuf,

        /// Worker count for directory batches. Defaults to the config.
        #[arg(long)]
        workers: Option<usize>,

        /// Input format when scrubbing a single file.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Ndjson,
}
