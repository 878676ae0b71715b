use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Overall polarity of a feedback comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All labels in the order they are offered to the zero-shot classifier.
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Scores at or above this are `Positive`.
    pub const POSITIVE_THRESHOLD: f32 = 0.6;
    /// Scores at or below this are `Negative`.
    pub const NEGATIVE_THRESHOLD: f32 = 0.4;

    /// Categorize a sentiment score in `[0.0, 1.0]`.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score >= Self::POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= Self::NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Vietnamese display label, also used as the zero-shot candidate label.
    #[must_use]
    pub fn label_vi(self) -> &'static str {
        match self {
            Self::Positive => "Tích cực",
            Self::Neutral => "Trung lập",
            Self::Negative => "Tiêu cực",
        }
    }
}

/// Feedback topic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    Salary,
    Environment,
    Management,
    Benefits,
    Praise,
    Complaint,
    Suggestion,
    Other,
}

impl Topic {
    /// The seven classifiable topics in declaration order. `Other` is the
    /// fallback and never receives votes.
    pub const TAXONOMY: [Topic; 7] = [
        Self::Salary,
        Self::Environment,
        Self::Management,
        Self::Benefits,
        Self::Praise,
        Self::Complaint,
        Self::Suggestion,
    ];

    #[must_use]
    pub fn label_vi(self) -> &'static str {
        match self {
            Self::Salary => "Lương",
            Self::Environment => "Môi trường",
            Self::Management => "Quản lý",
            Self::Benefits => "Phúc lợi",
            Self::Praise => "Khen ngợi",
            Self::Complaint => "Khiếu nại",
            Self::Suggestion => "Góp ý",
            Self::Other => "Khác",
        }
    }

    /// Resolve a classifier label, accepting either the Vietnamese label or
    /// the English variant name (case-insensitive).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::TAXONOMY
            .into_iter()
            .chain(std::iter::once(Self::Other))
            .find(|t| {
                t.label_vi().to_lowercase() == label.to_lowercase()
                    || format!("{t:?}").eq_ignore_ascii_case(label)
            })
    }
}

/// One `(label, score)` pair from a zero-shot classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    #[must_use]
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Winning topic and its share of the vote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicClassification {
    pub topic: Topic,
    pub confidence: f32,
}

/// Result of analyzing one feedback comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    /// In `[0.0, 1.0]`, two decimals. Higher is more positive.
    pub sentiment_score: f32,
    /// At most five keywords in first-seen order.
    pub keywords: Vec<String>,
    pub topic: Topic,
    /// In `[0.0, 1.0]`, two decimals.
    pub topic_confidence: f32,
    /// In `[1.0, 5.0]`. Equals the caller's rating when one was supplied.
    pub predicted_rating: f32,
}

/// Rating reported when there is no text to analyze and no known rating.
pub const MIDPOINT_RATING: f32 = 3.0;

impl AnalysisResult {
    /// Fixed result for empty or whitespace-only text.
    #[must_use]
    pub fn neutral_default(known_rating: Option<f32>) -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.5,
            keywords: Vec::new(),
            topic: Topic::Other,
            topic_confidence: 0.5,
            predicted_rating: known_rating.unwrap_or(MIDPOINT_RATING),
        }
    }
}

/// A single feedback item submitted for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackInput {
    pub text: String,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// Configuration for the inference engine.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub zero_shot_url: Option<String>,
    pub zero_shot_token: Option<String>,
    pub tei_url: Option<String>,
    /// Upper bound on any single model call, lock wait included.
    pub inference_timeout: Duration,
    pub serialize_inference: bool,
    pub batch_concurrency: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            zero_shot_url: None,
            zero_shot_token: None,
            tei_url: None,
            inference_timeout: Duration::from_secs(10),
            serialize_inference: false,
            batch_concurrency: 8,
        }
    }
}

impl SentimentConfig {
    #[must_use]
    pub fn from_app_config(config: &hrpulse_core::AppConfig) -> Self {
        Self {
            zero_shot_url: config.zero_shot_url.clone(),
            zero_shot_token: config.zero_shot_token.clone(),
            tei_url: config.tei_url.clone(),
            inference_timeout: Duration::from_millis(config.inference_timeout_ms),
            serialize_inference: config.serialize_inference,
            batch_concurrency: config.batch_concurrency,
        }
    }
}

/// Round `value` to `places` decimal digits.
pub(crate) fn round_dp(value: f32, places: i32) -> f32 {
    let factor = 10_f32.powi(places);
    (value * factor).round() / factor
}
