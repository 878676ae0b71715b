//! Penalty for unambiguous negative phrasing.
//!
//! Model tiers tend to be over-optimistic on complaints; this adjustment is
//! added to their score before re-clamping.

/// Phrases weighted [`STRONG_WEIGHT`] each.
pub(crate) const STRONG_NEGATIVE: &[&str] = &[
    "quá",
    "không có",
    "không hoạt động",
    "không tốt",
    "không đủ",
    "thường xuyên bị lỗi",
    "bị lỗi",
    "cũ",
    "khó",
    "rất nóng",
    "ồn ào",
    "không công bằng",
    "thiên vị",
    "bất công",
    "muốn nghỉ",
    "nghỉ việc",
    "thất vọng",
    "không hài lòng",
    "kém",
    "tồi tệ",
    "tệ",
    "xấu",
    "chậm",
    "bực",
];

/// Phrases weighted [`MODERATE_WEIGHT`] each.
pub(crate) const MODERATE_NEGATIVE: &[&str] = &[
    "vấn đề",
    "khó khăn",
    "thách thức",
    "cần cải thiện",
    "chưa tốt",
    "chưa đủ",
    "hạn chế",
    "thiếu",
];

const STRONG_WEIGHT: f32 = 0.30;
const MODERATE_WEIGHT: f32 = 0.15;

/// Count how many of `phrases` occur in already-lowercased `text`.
///
/// Each phrase counts at most once; overlapping phrases each count.
pub(crate) fn count_phrases(lowered: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| lowered.contains(*p)).count()
}

/// Negative adjustment in `[-1.0, 0.0]` for `text`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn negative_adjustment(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    let strong = count_phrases(&lowered, STRONG_NEGATIVE) as f32;
    let moderate = count_phrases(&lowered, MODERATE_NEGATIVE) as f32;

    (-(strong * STRONG_WEIGHT + moderate * MODERATE_WEIGHT)).clamp(-1.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn clean_text_has_no_adjustment() {
        assert_eq!(negative_adjustment("Môi trường làm việc tốt"), 0.0);
        assert_eq!(negative_adjustment(""), 0.0);
    }

    #[test]
    fn strong_phrases_weigh_point_three() {
        let adj = negative_adjustment("Dịch vụ chậm trễ, không hài lòng với cách xử lý.");
        assert!(approx(adj, -0.6), "expected -0.6, got {adj}");
    }

    #[test]
    fn moderate_phrases_weigh_point_one_five() {
        let adj = negative_adjustment("Quy trình cần cải thiện");
        assert!(approx(adj, -0.15), "expected -0.15, got {adj}");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let adj = negative_adjustment("THẤT VỌNG");
        assert!(approx(adj, -0.3), "expected -0.3, got {adj}");
    }

    #[test]
    fn overlapping_phrases_double_count() {
        // "tồi tệ" also contains "tệ".
        let adj = negative_adjustment("tồi tệ");
        assert!(approx(adj, -0.6), "expected -0.6, got {adj}");
    }

    #[test]
    fn clamps_to_negative_one() {
        let adj = negative_adjustment("thất vọng, bất công, thiên vị, muốn nghỉ việc, quá tệ");
        assert_eq!(adj, -1.0);
    }
}
