//! Stopword-filtered keyword extraction.

/// Function words dropped from keyword lists.
const STOPWORDS: &[&str] = &[
    "và", "của", "cho", "với", "là", "được", "trong", "từ", "về", "có", "không",
];

/// Tokens at or below this many characters are never keywords.
const MIN_TOKEN_CHARS: usize = 2;

/// Upper bound on extracted keywords.
pub const MAX_KEYWORDS: usize = 10;

/// Extract keywords from free text.
///
/// Lowercases, splits on whitespace, drops short tokens and stopwords, then
/// deduplicates in first-seen order. Punctuation is kept attached to tokens.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for token in lowered.split_whitespace() {
        if token.chars().count() <= MIN_TOKEN_CHARS || STOPWORDS.contains(&token) {
            continue;
        }
        if keywords.iter().any(|k| k == token) {
            continue;
        }
        keywords.push(token.to_string());
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n\t").is_empty());
    }

    #[test]
    fn drops_short_tokens_and_stopwords() {
        let keywords = extract_keywords("Lương của tôi và phụ cấp không đủ");
        assert_eq!(keywords, vec!["lương", "tôi", "phụ", "cấp"]);
    }

    #[test]
    fn short_token_length_counts_characters_not_bytes() {
        // "đủ" is two characters but four bytes in UTF-8.
        assert!(extract_keywords("đủ").is_empty());
        assert_eq!(extract_keywords("tốt"), vec!["tốt"]);
    }

    #[test]
    fn deduplicates_preserving_first_occurrence() {
        let keywords = extract_keywords("Team tốt, team vui, TEAM mạnh");
        assert_eq!(keywords, vec!["team", "tốt,", "vui,", "mạnh"]);
    }

    #[test]
    fn caps_at_ten_keywords() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let keywords = extract_keywords(text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords.first().map(String::as_str), Some("alpha"));
        assert_eq!(keywords.last().map(String::as_str), Some("juliet"));
    }
}
