//! Feedback inference engine for HR Pulse.
//!
//! Scores employee feedback for sentiment, extracts keywords, classifies it
//! into an HR topic and predicts a 1–5 rating. Sentiment comes from the best
//! available tier: a zero-shot classifier, then a text-embedding model, then
//! a rule-based lexicon that always succeeds.

pub mod analyzer;
pub mod capability;
pub mod error;
pub mod keywords;
pub mod negative;
pub mod pipeline;
pub mod rating;
pub mod scorer;
pub mod tiers;
pub mod topic;
pub mod types;

mod embeddings;
mod zero_shot;

pub use analyzer::{FeedbackAnalyzer, TieredAnalysis, RESULT_KEYWORDS};
pub use capability::{Capabilities, TextEmbedder, ZeroShotClassifier};
pub use embeddings::TeiClient;
pub use error::SentimentError;
pub use keywords::extract_keywords;
pub use negative::negative_adjustment;
pub use pipeline::{run_feedback_batch, BatchOutcome, FeedbackSummary};
pub use rating::predict_rating;
pub use scorer::lexicon_score;
pub use tiers::{CapabilityTier, TierStatus};
pub use topic::classify_topic;
pub use types::{
    AnalysisResult, FeedbackInput, LabelScore, Sentiment, SentimentConfig, Topic,
    TopicClassification, MIDPOINT_RATING,
};
pub use zero_shot::ZeroShotClient;
