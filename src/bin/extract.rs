//! Extracts one URL and prints the result as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use linkdigest::{ContentExtractor, config::Config};

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Extract normalised, chunked text and images from a web page")]
struct Cli {
    /// Page to extract
    url: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let extractor = ContentExtractor::new(&config)?;

    let outcome = extractor.extract(&cli.url).await;
    extractor.shutdown().await;

    let result = outcome.with_context(|| format!("Failed to extract {}", cli.url))?;
    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}
