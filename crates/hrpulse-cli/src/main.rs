mod analyze;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hrpulse_sentiment::{FeedbackAnalyzer, SentimentConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hrpulse-cli")]
#[command(about = "HR Pulse feedback analysis from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one comment, or every record of a JSON-lines file
    Analyze {
        /// Feedback text to analyze
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// Rating (1-5) the employee gave alongside the text
        #[arg(long, value_parser = analyze::parse_rating, conflicts_with = "file")]
        rating: Option<f32>,

        /// JSON-lines file of `{"text": ..., "rating": ...}` records
        #[arg(long)]
        file: Option<PathBuf>,

        /// Concurrent analyses for --file (defaults to HRPULSE_BATCH_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Probe the configured backends and show which tiers are available
    Capabilities,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = hrpulse_core::load_app_config()?;

    // stdout carries JSON output; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let sentiment_config = SentimentConfig::from_app_config(&config);
    let analyzer = FeedbackAnalyzer::from_config(&sentiment_config).await;

    match cli.command {
        Commands::Analyze {
            text,
            rating,
            file,
            concurrency,
        } => match (text, file) {
            (_, Some(path)) => {
                let concurrency = concurrency.unwrap_or(sentiment_config.batch_concurrency);
                analyze::run_analyze_file(&analyzer, &path, concurrency).await?;
            }
            (Some(text), None) => analyze::run_analyze_text(&analyzer, &text, rating).await?,
            (None, None) => anyhow::bail!("either --text or --file is required"),
        },
        Commands::Capabilities => analyze::run_capabilities(&analyzer),
    }

    Ok(())
}
