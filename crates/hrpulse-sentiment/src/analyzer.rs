//! Tiered feedback analyzer.
//!
//! Build one [`FeedbackAnalyzer`] per process (probing loads models), share it
//! behind an `Arc`, and call [`FeedbackAnalyzer::analyze`] from any number of
//! tasks. The analyzer keeps no per-call state.

use std::sync::Arc;

use serde::Serialize;

use crate::capability::{Capabilities, InferenceGate};
use crate::embeddings::TeiClient;
use crate::keywords::extract_keywords;
use crate::rating::predict_rating;
use crate::scorer::lexicon_score;
use crate::tiers::{
    CapabilityTier, EmbeddingStrategy, SentimentStrategy, TierOutcome, TierStatus,
    ZeroShotStrategy,
};
use crate::topic::classify_topic;
use crate::types::{round_dp, AnalysisResult, Sentiment, SentimentConfig};
use crate::zero_shot::ZeroShotClient;

/// Keywords kept in an [`AnalysisResult`].
pub const RESULT_KEYWORDS: usize = 5;

/// Short text used to check that a backend answers at all.
const PROBE_TEXT: &str = "Kiểm tra kết nối";

/// An analysis together with the tier that produced its sentiment score.
///
/// `tier` is `None` when the text was empty and no tier ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieredAnalysis {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub tier: Option<CapabilityTier>,
}

pub struct FeedbackAnalyzer {
    /// Model-backed tiers in priority order. Rule-based scoring follows them.
    strategies: Vec<Box<dyn SentimentStrategy>>,
}

impl std::fmt::Debug for FeedbackAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackAnalyzer")
            .field("tiers", &self.tiers())
            .finish()
    }
}

impl FeedbackAnalyzer {
    /// Build an analyzer over `capabilities` without probing them.
    ///
    /// Every backend supplied is treated as available.
    #[must_use]
    pub fn new(capabilities: Capabilities, config: &SentimentConfig) -> Self {
        let gate = Arc::new(InferenceGate::new(
            config.inference_timeout,
            config.serialize_inference,
        ));

        let mut strategies: Vec<Box<dyn SentimentStrategy>> = Vec::new();
        if let Some(classifier) = capabilities.zero_shot {
            strategies.push(Box::new(ZeroShotStrategy::new(
                classifier,
                Arc::clone(&gate),
            )));
        }
        if let Some(embedder) = capabilities.embedder {
            strategies.push(Box::new(EmbeddingStrategy::new(embedder, Arc::clone(&gate))));
        }

        Self { strategies }
    }

    /// An analyzer with no model backends.
    #[must_use]
    pub fn rule_based() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Build an analyzer keeping only the candidate backends that answer a
    /// probe request within the configured timeout.
    ///
    /// Unavailable backends are logged and dropped; they never fail construction.
    pub async fn probe(candidates: Capabilities, config: &SentimentConfig) -> Self {
        let gate = InferenceGate::new(config.inference_timeout, false);
        let mut available = Capabilities::none();

        if let Some(classifier) = candidates.zero_shot {
            let labels = Sentiment::ALL.map(Sentiment::label_vi);
            match gate.run(classifier.classify(PROBE_TEXT, &labels)).await {
                Ok(_) => {
                    tracing::info!(
                        tier = %CapabilityTier::ZeroShotClassifier,
                        "capability available"
                    );
                    available.zero_shot = Some(classifier);
                }
                Err(e) => tracing::warn!(
                    tier = %CapabilityTier::ZeroShotClassifier,
                    error = %e,
                    "capability unavailable; tier disabled"
                ),
            }
        }

        if let Some(embedder) = candidates.embedder {
            match gate.run(embedder.embed(PROBE_TEXT)).await {
                Ok(vector) if !vector.is_empty() => {
                    tracing::info!(
                        tier = %CapabilityTier::EmbeddingModel,
                        dimensions = vector.len(),
                        "capability available"
                    );
                    available.embedder = Some(embedder);
                }
                Ok(_) => tracing::warn!(
                    tier = %CapabilityTier::EmbeddingModel,
                    "probe returned an empty embedding; tier disabled"
                ),
                Err(e) => tracing::warn!(
                    tier = %CapabilityTier::EmbeddingModel,
                    error = %e,
                    "capability unavailable; tier disabled"
                ),
            }
        }

        Self::new(available, config)
    }

    /// Build HTTP backends for every configured URL, then [`probe`](Self::probe) them.
    pub async fn from_config(config: &SentimentConfig) -> Self {
        let mut candidates = Capabilities::none();

        if let Some(url) = &config.zero_shot_url {
            candidates = candidates.with_zero_shot(Arc::new(ZeroShotClient::new(
                url,
                config.zero_shot_token.as_deref(),
            )));
        } else {
            tracing::info!("no zero-shot endpoint configured");
        }

        if let Some(url) = &config.tei_url {
            candidates = candidates.with_embedder(Arc::new(TeiClient::new(url)));
        } else {
            tracing::info!("no TEI endpoint configured");
        }

        Self::probe(candidates, config).await
    }

    /// Availability of every tier. Rule-based is always available.
    #[must_use]
    pub fn tiers(&self) -> Vec<TierStatus> {
        CapabilityTier::ALL
            .into_iter()
            .map(|tier| TierStatus {
                tier,
                available: self.is_available(tier),
            })
            .collect()
    }

    #[must_use]
    pub fn is_available(&self, tier: CapabilityTier) -> bool {
        tier == CapabilityTier::RuleBased || self.strategies.iter().any(|s| s.tier() == tier)
    }

    /// Analyze one feedback comment. Never fails.
    pub async fn analyze(&self, text: &str, known_rating: Option<f32>) -> AnalysisResult {
        self.analyze_with_tier(text, known_rating).await.result
    }

    /// Like [`analyze`](Self::analyze), also reporting which tier scored the text.
    ///
    /// A non-finite `known_rating` is ignored.
    pub async fn analyze_with_tier(
        &self,
        text: &str,
        known_rating: Option<f32>,
    ) -> TieredAnalysis {
        let known_rating = known_rating.filter(|r| r.is_finite());
        let text = text.trim();

        if text.is_empty() {
            return TieredAnalysis {
                result: AnalysisResult::neutral_default(known_rating),
                tier: None,
            };
        }

        let (tier, outcome) = self.score(text, known_rating).await;
        let sentiment_score = outcome.score.clamp(0.0, 1.0);

        let mut keywords = extract_keywords(text);
        keywords.truncate(RESULT_KEYWORDS);
        let topic = classify_topic(text, outcome.topic_scores.as_deref());
        let predicted_rating = predict_rating(text, sentiment_score, known_rating);

        TieredAnalysis {
            result: AnalysisResult {
                sentiment: Sentiment::from_score(sentiment_score),
                sentiment_score: round_dp(sentiment_score, 2),
                keywords,
                topic: topic.topic,
                topic_confidence: topic.confidence,
                predicted_rating,
            },
            tier: Some(tier),
        }
    }

    /// Try each model tier in order, falling back to the lexicon scorer.
    async fn score(
        &self,
        text: &str,
        known_rating: Option<f32>,
    ) -> (CapabilityTier, TierOutcome) {
        for strategy in &self.strategies {
            match strategy.try_score(text, known_rating).await {
                Ok(outcome) => {
                    tracing::debug!(
                        tier = %strategy.tier(),
                        score = outcome.score,
                        "tier scored text"
                    );
                    return (strategy.tier(), outcome);
                }
                Err(e) => {
                    tracing::warn!(
                        tier = %strategy.tier(),
                        error = %e,
                        "tier failed; falling through"
                    );
                }
            }
        }

        let outcome = TierOutcome {
            score: lexicon_score(text, known_rating),
            topic_scores: None,
        };
        tracing::debug!(
            tier = %CapabilityTier::RuleBased,
            score = outcome.score,
            "tier scored text"
        );
        (CapabilityTier::RuleBased, outcome)
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
