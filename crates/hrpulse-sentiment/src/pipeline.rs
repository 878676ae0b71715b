//! Batch analysis.

use std::collections::BTreeMap;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::analyzer::{FeedbackAnalyzer, TieredAnalysis};
use crate::tiers::CapabilityTier;
use crate::types::{round_dp, FeedbackInput, Sentiment, Topic};

/// Per-item analyses, in input order, plus their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<TieredAnalysis>,
    pub summary: FeedbackSummary,
}

/// Aggregate view over a set of analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub count: usize,
    pub by_sentiment: BTreeMap<Sentiment, usize>,
    pub by_topic: BTreeMap<Topic, usize>,
    /// Items with empty text ran no tier and are not counted here.
    pub by_tier: BTreeMap<CapabilityTier, usize>,
    /// `None` for an empty batch.
    pub mean_sentiment_score: Option<f32>,
    pub mean_predicted_rating: Option<f32>,
}

impl FeedbackSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[TieredAnalysis]) -> Self {
        let mut summary = Self {
            count: results.len(),
            ..Self::default()
        };
        if results.is_empty() {
            return summary;
        }

        let mut score_sum = 0.0_f32;
        let mut rating_sum = 0.0_f32;
        for analysis in results {
            let result = &analysis.result;
            *summary.by_sentiment.entry(result.sentiment).or_default() += 1;
            *summary.by_topic.entry(result.topic).or_default() += 1;
            if let Some(tier) = analysis.tier {
                *summary.by_tier.entry(tier).or_default() += 1;
            }
            score_sum += result.sentiment_score;
            rating_sum += result.predicted_rating;
        }

        let n = results.len() as f32;
        summary.mean_sentiment_score = Some(round_dp(score_sum / n, 2));
        summary.mean_predicted_rating = Some(round_dp(rating_sum / n, 2));
        summary
    }
}

/// Analyze every input with at most `concurrency` analyses in flight.
///
/// Results keep input order. A `concurrency` of zero is treated as one.
pub async fn run_feedback_batch(
    analyzer: &FeedbackAnalyzer,
    inputs: &[FeedbackInput],
    concurrency: usize,
) -> BatchOutcome {
    let started = Instant::now();

    // Materialize the (lazy) futures first so the stream type does not carry
    // the closure, which trips higher-ranked `Send` inference in axum handlers.
    let pending: Vec<_> = inputs
        .iter()
        .map(|input| analyzer.analyze_with_tier(&input.text, input.rating))
        .collect();
    let results: Vec<TieredAnalysis> = stream::iter(pending)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let summary = FeedbackSummary::from_results(&results);
    tracing::info!(
        count = summary.count,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "feedback batch analyzed"
    );

    BatchOutcome { results, summary }
}
