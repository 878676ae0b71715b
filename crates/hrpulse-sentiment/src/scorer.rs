//! Lexicon scorer used by the rule-based tier.

use crate::negative::{count_phrases, negative_adjustment};

/// Phrases counted +1 each.
pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "tốt",
    "tuyệt",
    "hài lòng",
    "đẹp",
    "nhanh",
    "chuyên nghiệp",
    "xuất sắc",
    "tuyệt vời",
    "cảm ơn",
    "đánh giá cao",
    "thích",
    "yêu thích",
    "ưng ý",
    "tốt lắm",
    "rất tốt",
    "rất hài lòng",
];

/// Phrases counted −1.5 each. Missing a complaint costs more than missing
/// praise, hence the heavier weight.
pub(crate) const NEGATIVE_WORDS: &[&str] = &[
    "xấu",
    "tệ",
    "chậm",
    "bực",
    "không hài lòng",
    "khiếu nại",
    "thất vọng",
    "kém",
    "tồi tệ",
    "không tốt",
    "không đủ",
    "quá",
    "ồn ào",
    "cũ",
    "bị lỗi",
    "khó",
    "nóng",
    "thiên vị",
    "bất công",
    "nghỉ việc",
    "muốn nghỉ",
];

const POSITIVE_WEIGHT: f32 = 1.0;
const NEGATIVE_WEIGHT: f32 = 1.5;
/// The negative adjustment is on a `[-1, 0]` scale; raw lexicon scores span
/// roughly ±8.
const ADJUSTMENT_SCALE: f32 = 5.0;
const RATING_WEIGHT: f32 = 0.5;
const NORMALIZER: f32 = 8.0;

/// Score `text` with the domain lexicon, returning a sentiment score in `[0.0, 1.0]`.
///
/// Sums phrase hits, folds in the negative-phrase adjustment and the known
/// rating (if any), then maps `clamp(score / 8, -1, 1)` onto `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn lexicon_score(text: &str, known_rating: Option<f32>) -> f32 {
    let lowered = text.to_lowercase();

    let mut score = count_phrases(&lowered, POSITIVE_WORDS) as f32 * POSITIVE_WEIGHT
        - count_phrases(&lowered, NEGATIVE_WORDS) as f32 * NEGATIVE_WEIGHT;

    score += negative_adjustment(text) * ADJUSTMENT_SCALE;

    if let Some(rating) = known_rating {
        score += (rating - 3.0) * RATING_WEIGHT;
    }

    let normalized = (score / NORMALIZER).clamp(-1.0, 1.0);
    (normalized + 1.0) / 2.0
}
