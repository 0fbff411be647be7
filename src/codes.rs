//! # Additive Code Extraction
//!
//! Finds tokens shaped like food-additive codes ("E471", "e160a", "E472i").
//! The check is deliberately permissive; a token only becomes a detection
//! when the catalog actually holds that code.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use crate::matcher::split_words;

lazy_static! {
    // "E" + alphanumeric suffix ending in a digit, a-f or i
    static ref CODE_TOKEN: Regex = Regex::new(r"(?i)^e[\p{Alphabetic}\p{N}\p{M}]*[0-9a-fi]$")
        .expect("Additive code pattern should be valid");
}

/// Whether a single token qualifies as an additive code candidate
pub fn is_code_token(token: &str) -> bool {
    token.chars().count() > 1 && CODE_TOKEN.is_match(token)
}

/// Extract upper-cased, deduplicated additive code candidates from text
///
/// The text is split into words on anything but letters, digits and combining
/// marks, so "E472(i)" yields "E472" and "I" separately while "E472i" stays
/// one token. The result is ordered so that analysis output is reproducible.
pub fn extract_codes(text: &str) -> BTreeSet<String> {
    split_words(text)
        .filter(|token| is_code_token(token))
        .map(str::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_codes() {
        let codes = extract_codes("Состав: мука, сахар, эмульгатор E471.");
        assert_eq!(codes.into_iter().collect::<Vec<_>>(), vec!["E471"]);
    }

    #[test]
    fn test_codes_are_upper_cased_and_deduplicated() {
        let codes = extract_codes("e160a, E160A; краситель e160a");
        assert_eq!(codes.len(), 1);
        assert!(codes.contains("E160A"));
    }

    #[test]
    fn test_letter_suffixes() {
        let codes = extract_codes("E472i E150d E333iii E407");
        assert!(codes.contains("E472I"));
        assert!(codes.contains("E150D"));
        assert!(codes.contains("E333III"));
        assert!(codes.contains("E407"));
    }

    #[test]
    fn test_rejects_non_code_tokens() {
        assert!(!is_code_token("E"));
        assert!(!is_code_token("e"));
        assert!(!is_code_token("Egg"));
        assert!(!is_code_token("emulsifier"));
        assert!(!is_code_token("471"));
    }

    #[test]
    fn test_permissive_heuristic_accepts_some_words() {
        // Filtered later by the catalog lookup
        assert!(is_code_token("extra"));
        assert!(is_code_token("Edible"));
    }

    #[test]
    fn test_combining_mark_does_not_split_token() {
        let codes = extract_codes("E47\u{301}1, E322");
        assert!(!codes.contains("E47"));
        assert!(codes.contains("E322"));
    }

    #[test]
    fn test_empty_and_noise_input() {
        assert!(extract_codes("").is_empty());
        assert!(extract_codes("!!! ??? ---").is_empty());
    }
}
