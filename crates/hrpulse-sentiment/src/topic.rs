//! Keyword-vote topic classifier.
//!
//! Each topic receives one vote per keyword found in the text. When the
//! zero-shot tier produced topic scores, each score is added to its topic's
//! votes with double weight. The topic with the most votes wins; ties go to
//! the topic declared first in [`Topic::TAXONOMY`].

use crate::types::{round_dp, LabelScore, Topic, TopicClassification};

/// External classifier scores count twice as much as a single keyword hit.
const EXTERNAL_WEIGHT: f32 = 2.0;

/// Confidence reported when no topic received any vote.
const NO_VOTE_CONFIDENCE: f32 = 0.5;

fn topic_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Salary => &[
            "lương",
            "thưởng",
            "tăng lương",
            "mức lương",
            "lương thấp",
            "lương cao",
            "bonus",
            "tiền lương",
            "lương bổng",
            "lương quá",
        ],
        Topic::Environment => &[
            "môi trường",
            "đồng nghiệp",
            "văn phòng",
            "không gian",
            "làm việc",
            "nơi làm việc",
            "văn hóa",
            "team",
            "phòng ban",
        ],
        Topic::Management => &[
            "sếp",
            "quản lý",
            "trưởng phòng",
            "leader",
            "manager",
            "giám đốc",
            "điều hành",
            "lãnh đạo",
            "thiên vị",
            "công bằng",
        ],
        Topic::Benefits => &[
            "phúc lợi",
            "bảo hiểm",
            "nghỉ phép",
            "du lịch",
            "đào tạo",
            "khám sức khỏe",
            "gym",
            "ăn trưa",
            "xe đưa đón",
        ],
        Topic::Praise => &[
            "tuyệt vời",
            "xuất sắc",
            "tốt",
            "cảm ơn",
            "đánh giá cao",
            "hài lòng",
            "thích",
            "yêu thích",
        ],
        Topic::Complaint => &[
            "khiếu nại",
            "phàn nàn",
            "thất vọng",
            "không hài lòng",
            "bất công",
            "nghỉ việc",
            "muốn nghỉ",
        ],
        Topic::Suggestion => &["góp ý", "đề xuất", "cải thiện", "tối ưu", "suggest"],
        Topic::Other => &[],
    }
}

/// Classify `text` into one topic of the taxonomy.
///
/// `external` holds zero-shot scores over the topic labels. Labels outside the
/// taxonomy and non-finite or negative scores are ignored, leaving plain
/// keyword voting for those entries.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_topic(text: &str, external: Option<&[LabelScore]>) -> TopicClassification {
    let lowered = text.to_lowercase();

    let mut votes: Vec<(Topic, f32)> = Topic::TAXONOMY
        .iter()
        .map(|&topic| {
            let hits = topic_keywords(topic)
                .iter()
                .filter(|kw| lowered.contains(*kw))
                .count();
            (topic, hits as f32)
        })
        .collect();

    if let Some(scores) = external {
        for entry in scores {
            let Some(topic) = Topic::from_label(&entry.label) else {
                tracing::debug!(label = %entry.label, "ignoring label outside topic taxonomy");
                continue;
            };
            if !entry.score.is_finite() || entry.score < 0.0 {
                tracing::debug!(
                    label = %entry.label,
                    score = entry.score,
                    "ignoring invalid topic score"
                );
                continue;
            }
            if let Some(slot) = votes.iter_mut().find(|(t, _)| *t == topic) {
                slot.1 += entry.score * EXTERNAL_WEIGHT;
            }
        }
    }

    let total: f32 = votes.iter().map(|(_, v)| v).sum();

    // First strictly-greater wins, so earlier topics keep ties.
    let mut best = (Topic::Other, 0.0_f32);
    for &(topic, vote) in &votes {
        if vote > best.1 {
            best = (topic, vote);
        }
    }

    if best.1 <= 0.0 {
        return TopicClassification {
            topic: Topic::Other,
            confidence: NO_VOTE_CONFIDENCE,
        };
    }

    let confidence = (best.1 / total.max(1.0)).min(1.0);
    TopicClassification {
        topic: best.0,
        confidence: round_dp(confidence, 2),
    }
}
