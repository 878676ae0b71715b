//! Command handlers for `analyze` and `capabilities`.

use std::path::Path;

use anyhow::Context;
use hrpulse_sentiment::{run_feedback_batch, FeedbackAnalyzer, FeedbackInput, TierStatus};

/// Clap value parser for `--rating`.
pub(crate) fn parse_rating(raw: &str) -> Result<f32, String> {
    let rating: f32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !rating.is_finite() || !(1.0..=5.0).contains(&rating) {
        return Err(format!("rating must be between 1 and 5, got {raw}"));
    }
    Ok(rating)
}

/// Parse JSON-lines feedback records. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error naming the first line that is not a valid record.
pub(crate) fn parse_jsonl(contents: &str) -> anyhow::Result<Vec<FeedbackInput>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<FeedbackInput>(line)
                .with_context(|| format!("line {}: invalid feedback record", index + 1))
        })
        .collect()
}

pub(crate) fn format_tiers(tiers: &[TierStatus]) -> Vec<String> {
    tiers
        .iter()
        .map(|status| {
            let state = if status.available {
                "available"
            } else {
                "unavailable"
            };
            let tier = status.tier.to_string();
            format!("{tier:<22} {state}")
        })
        .collect()
}

pub(crate) async fn run_analyze_text(
    analyzer: &FeedbackAnalyzer,
    text: &str,
    rating: Option<f32>,
) -> anyhow::Result<()> {
    let analysis = analyzer.analyze_with_tier(text, rating).await;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Print one JSON line per record, in file order, then the summary on stderr.
pub(crate) async fn run_analyze_file(
    analyzer: &FeedbackAnalyzer,
    path: &Path,
    concurrency: usize,
) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let inputs = parse_jsonl(&contents)?;

    if inputs.is_empty() {
        tracing::warn!(path = %path.display(), "no feedback records; nothing to analyze");
        return Ok(());
    }

    let invalid = inputs
        .iter()
        .position(|input| input.rating.is_some_and(|r| !(1.0..=5.0).contains(&r)));
    if let Some(index) = invalid {
        anyhow::bail!("record {}: rating must be between 1 and 5", index + 1);
    }

    let outcome = run_feedback_batch(analyzer, &inputs, concurrency).await;
    for analysis in &outcome.results {
        println!("{}", serde_json::to_string(analysis)?);
    }
    eprintln!("{}", serde_json::to_string_pretty(&outcome.summary)?);

    Ok(())
}

pub(crate) fn run_capabilities(analyzer: &FeedbackAnalyzer) {
    for line in format_tiers(&analyzer.tiers()) {
        println!("{line}");
    }
}
