//! Model-backed scoring strategies, tried in priority order by the analyzer.
//!
//! Each strategy either produces a sentiment score in `[0.0, 1.0]` or fails,
//! in which case the analyzer moves on to the next one. The rule-based
//! lexicon scorer is not a strategy here: it cannot fail, so the analyzer
//! calls it directly as the final fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capability::{InferenceGate, TextEmbedder, ZeroShotClassifier};
use crate::error::SentimentError;
use crate::negative::negative_adjustment;
use crate::types::{LabelScore, Sentiment, Topic};

/// Inference tiers in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTier {
    ZeroShotClassifier,
    EmbeddingModel,
    RuleBased,
}

impl CapabilityTier {
    pub const ALL: [CapabilityTier; 3] = [
        Self::ZeroShotClassifier,
        Self::EmbeddingModel,
        Self::RuleBased,
    ];
}

impl std::fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityTier::ZeroShotClassifier => write!(f, "zero_shot_classifier"),
            CapabilityTier::EmbeddingModel => write!(f, "embedding_model"),
            CapabilityTier::RuleBased => write!(f, "rule_based"),
        }
    }
}

/// Availability of one tier, as resolved when the analyzer was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStatus {
    pub tier: CapabilityTier,
    pub available: bool,
}

/// A successful tier attempt.
#[derive(Debug, Clone)]
pub(crate) struct TierOutcome {
    /// Sentiment score in `[0.0, 1.0]`, adjustments already applied.
    pub score: f32,
    /// Zero-shot scores over the topic labels, when the tier produced them.
    pub topic_scores: Option<Vec<LabelScore>>,
}

#[async_trait]
pub(crate) trait SentimentStrategy: Send + Sync {
    fn tier(&self) -> CapabilityTier;

    async fn try_score(
        &self,
        text: &str,
        known_rating: Option<f32>,
    ) -> Result<TierOutcome, SentimentError>;
}

/// Pull of a known rating towards agreement: `(rating - 3) / 2 * weight`.
fn rating_nudge(known_rating: Option<f32>, weight: f32) -> f32 {
    known_rating.map_or(0.0, |rating| (rating - 3.0) / 2.0 * weight)
}

const ZERO_SHOT_RATING_WEIGHT: f32 = 0.2;
/// Embedding scores are a weaker signal, so the rating pulls harder.
const EMBEDDING_RATING_WEIGHT: f32 = 0.3;

/// Tier 1: three-way zero-shot classification.
pub(crate) struct ZeroShotStrategy {
    classifier: Arc<dyn ZeroShotClassifier>,
    gate: Arc<InferenceGate>,
}

impl ZeroShotStrategy {
    pub(crate) fn new(classifier: Arc<dyn ZeroShotClassifier>, gate: Arc<InferenceGate>) -> Self {
        Self { classifier, gate }
    }

    /// Topic scores for blending. Failures are logged and dropped; the topic
    /// classifier then relies on keywords alone.
    async fn topic_scores(&self, text: &str) -> Option<Vec<LabelScore>> {
        let labels = Topic::TAXONOMY.map(Topic::label_vi);
        match self.gate.run(self.classifier.classify(text, &labels)).await {
            Ok(scores) => Some(scores),
            Err(e) => {
                tracing::warn!(error = %e, "zero-shot topic scoring failed; using keywords only");
                None
            }
        }
    }
}

#[async_trait]
impl SentimentStrategy for ZeroShotStrategy {
    fn tier(&self) -> CapabilityTier {
        CapabilityTier::ZeroShotClassifier
    }

    async fn try_score(
        &self,
        text: &str,
        known_rating: Option<f32>,
    ) -> Result<TierOutcome, SentimentError> {
        let labels = Sentiment::ALL.map(Sentiment::label_vi);
        let ranked = self.gate.run(self.classifier.classify(text, &labels)).await?;

        let top = ranked
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or(SentimentError::EmptyResponse("zero-shot returned no labels"))?;
        if !top.score.is_finite() {
            return Err(SentimentError::InvalidOutput(format!(
                "non-finite score for label '{}'",
                top.label
            )));
        }

        // The adjusted score, not the model's own label, decides the sentiment.
        let mut score =
            (top.score + rating_nudge(known_rating, ZERO_SHOT_RATING_WEIGHT)).clamp(0.0, 1.0);
        score = (score + negative_adjustment(text)).clamp(0.0, 1.0);

        Ok(TierOutcome {
            score,
            topic_scores: self.topic_scores(text).await,
        })
    }
}

/// Tier 2: mean activation of a contextual embedding.
pub(crate) struct EmbeddingStrategy {
    embedder: Arc<dyn TextEmbedder>,
    gate: Arc<InferenceGate>,
}

impl EmbeddingStrategy {
    pub(crate) fn new(embedder: Arc<dyn TextEmbedder>, gate: Arc<InferenceGate>) -> Self {
        Self { embedder, gate }
    }
}

#[async_trait]
impl SentimentStrategy for EmbeddingStrategy {
    fn tier(&self) -> CapabilityTier {
        CapabilityTier::EmbeddingModel
    }

    #[allow(clippy::cast_precision_loss)]
    async fn try_score(
        &self,
        text: &str,
        known_rating: Option<f32>,
    ) -> Result<TierOutcome, SentimentError> {
        let embedding = self.gate.run(self.embedder.embed(text)).await?;
        if embedding.is_empty() {
            return Err(SentimentError::EmptyResponse("embedding has no dimensions"));
        }

        let mean = embedding.iter().sum::<f32>() / embedding.len() as f32;
        if !mean.is_finite() {
            return Err(SentimentError::InvalidOutput(
                "embedding contains non-finite values".to_string(),
            ));
        }

        let mut score = ((mean + 1.0) / 2.0).clamp(0.0, 1.0);
        score = (score + negative_adjustment(text)).clamp(0.0, 1.0);
        score = (score + rating_nudge(known_rating, EMBEDDING_RATING_WEIGHT)).clamp(0.0, 1.0);

        Ok(TierOutcome {
            score,
            topic_scores: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered_by_priority() {
        assert!(CapabilityTier::ZeroShotClassifier < CapabilityTier::EmbeddingModel);
        assert!(CapabilityTier::EmbeddingModel < CapabilityTier::RuleBased);
    }

    #[test]
    fn tier_serializes_as_snake_case() {
        let json = serde_json::to_string(&CapabilityTier::EmbeddingModel).expect("serialize");
        assert_eq!(json, "\"embedding_model\"");
        assert_eq!(CapabilityTier::EmbeddingModel.to_string(), "embedding_model");
    }

    #[test]
    fn rating_nudge_is_zero_without_rating_and_at_midpoint() {
        assert_eq!(rating_nudge(None, 0.3), 0.0);
        assert_eq!(rating_nudge(Some(3.0), 0.3), 0.0);
    }

    #[test]
    fn rating_nudge_scales_with_distance_from_midpoint() {
        assert!((rating_nudge(Some(5.0), 0.2) - 0.2).abs() < 1e-6);
        assert!((rating_nudge(Some(1.0), 0.3) + 0.3).abs() < 1e-6);
    }
}
