//! Satisfaction rating prediction.

use crate::negative::count_phrases;
use crate::types::round_dp;

/// Wording that signals high satisfaction.
const SATISFIED: &[&str] = &[
    "rất hài lòng",
    "tuyệt vời",
    "xuất sắc",
    "tốt",
    "tốt lắm",
    "thích",
    "yêu thích",
    "cảm ơn",
    "đánh giá cao",
    "ưng ý",
];

/// Wording that signals low satisfaction.
const DISSATISFIED: &[&str] = &[
    "không hài lòng",
    "thất vọng",
    "tệ",
    "kém",
    "tồi tệ",
    "muốn nghỉ",
    "nghỉ việc",
    "bất công",
    "thiên vị",
    "không đủ",
];

const KEYWORD_NUDGE: f32 = 0.5;

/// Predict a 1–5 satisfaction rating.
///
/// A known rating is returned as-is. Otherwise the sentiment score is mapped
/// linearly onto `[1, 5]`, nudged by satisfaction wording, and pinned to at
/// least 4.0 for scores ≥ 0.7 or at most 2.0 for scores ≤ 0.3.
#[must_use]
pub fn predict_rating(text: &str, sentiment_score: f32, known_rating: Option<f32>) -> f32 {
    if let Some(rating) = known_rating {
        return rating;
    }

    let lowered = text.to_lowercase();
    let satisfied = count_phrases(&lowered, SATISFIED);
    let dissatisfied = count_phrases(&lowered, DISSATISFIED);

    let mut rating = 1.0 + sentiment_score * 4.0;

    if satisfied > dissatisfied {
        rating += KEYWORD_NUDGE;
    } else if dissatisfied > satisfied {
        rating -= KEYWORD_NUDGE;
    }

    if sentiment_score >= 0.7 {
        rating = rating.max(4.0);
    } else if sentiment_score <= 0.3 {
        rating = rating.min(2.0);
    }

    round_dp(rating.clamp(1.0, 5.0), 1)
}
