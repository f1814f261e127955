use clap::Parser;
use tracing_subscriber::EnvFilter;

use mailscrub::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract { file, out, map } => {
            mailscrub::cli::extract::run(&file, &out, &map).await?;
        }
        Commands::Redact {
            input,
            out,
            workers,
            format,
        } => {
            mailscrub::cli::redact::run(&input, &out, workers, format).await?;
        }
    }
    Ok(())
}
