//! # Fuzzy Name Matching
//!
//! Scores how well a catalog ingredient name is represented in label text.
//!
//! ## Scoring Rules
//!
//! Rules are evaluated in order and the first one that applies decides:
//!
//! 1. **Short names** (fewer than 5 characters): only a whole-word,
//!    case-insensitive match counts, scored [`SHORT_NAME_SCORE`].
//! 2. **Exact phrase**: the whole name found at word boundaries scores
//!    [`EXACT_MATCH_SCORE`].
//! 3. **Word overlap**: the name is split into words. Words of 4+ characters
//!    are *significant* and are counted; 3-character words are *qualifiers*
//!    and must all be present or the match is rejected. The ratio of matched
//!    significant words must reach [`required_ratio`], and the score is the
//!    ratio scaled by [`PARTIAL_MATCH_CAP`].
//!
//! Patterns are compiled once per catalog name ([`NamePattern::compile`]) so
//! that analysis calls only run prebuilt regexes.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    // Letters, digits and combining marks form words; everything else separates
    static ref WORD_SEPARATOR: Regex = Regex::new(r"[^\p{Alphabetic}\p{N}\p{M}]+")
        .expect("Word separator pattern should be valid");
}

/// Names shorter than this (in characters) only accept whole-word matches
pub const SHORT_NAME_MAX_CHARS: usize = 5;
/// Score given to a whole-word match of a short name
pub const SHORT_NAME_SCORE: f64 = 0.7;
/// Score given to an exact whole-phrase match
pub const EXACT_MATCH_SCORE: f64 = 1.0;
/// Ceiling applied to word-overlap matches
pub const PARTIAL_MATCH_CAP: f64 = 0.85;
/// Minimum length of a word counted in the overlap ratio
pub const SIGNIFICANT_WORD_MIN_CHARS: usize = 4;
/// Length of qualifier words that must all be present
pub const QUALIFIER_WORD_CHARS: usize = 3;
/// Overlap ratio required for names with one or two significant words
pub const FULL_OVERLAP_RATIO: f64 = 1.0;
/// Overlap ratio required for names with three significant words (two of three)
pub const TWO_OF_THREE_RATIO: f64 = 2.0 / 3.0;
/// Overlap ratio required for names with four or more significant words
pub const LONG_NAME_OVERLAP_RATIO: f64 = 0.75;

/// Lower-case and trim a name or word for comparison
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Split text into raw words, keeping combining marks inside the word
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    WORD_SEPARATOR.split(text).filter(|word| !word.is_empty())
}

/// Split text into lower-cased words
pub fn tokenize(text: &str) -> Vec<String> {
    split_words(text).map(str::to_lowercase).collect()
}

/// Overlap ratio a name needs given its number of significant words
pub fn required_ratio(significant_words: usize) -> f64 {
    match significant_words {
        0..=2 => FULL_OVERLAP_RATIO,
        3 => TWO_OF_THREE_RATIO,
        _ => LONG_NAME_OVERLAP_RATIO,
    }
}

/// A word or phrase searched for at word boundaries, case-insensitively
#[derive(Debug, Clone)]
pub struct WordPattern {
    text: String,
    regex: Regex,
}

impl WordPattern {
    /// Compile a whole-word pattern; returns `None` for blank input
    pub fn new(text: &str) -> Option<Self> {
        let text = normalize(text);
        if text.is_empty() {
            return None;
        }
        let regex = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&text))).ok()?;
        Some(Self { text, regex })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// Precompiled matching data for one catalog name
#[derive(Debug, Clone)]
pub struct NamePattern {
    display: String,
    phrase: WordPattern,
    /// The phrase immediately followed by another word
    continued: Regex,
    char_len: usize,
    significant: Vec<WordPattern>,
    qualifiers: Vec<WordPattern>,
}

impl NamePattern {
    /// Compile the patterns for a catalog name; blank names yield `None`
    pub fn compile(name: &str) -> Option<Self> {
        let phrase = WordPattern::new(name)?;
        let continued =
            Regex::new(&format!(r"(?i)\b{}\s+\w+", regex::escape(phrase.text()))).ok()?;

        let words = tokenize(phrase.text());
        let significant = words
            .iter()
            .filter(|w| w.chars().count() >= SIGNIFICANT_WORD_MIN_CHARS)
            .filter_map(|w| WordPattern::new(w))
            .collect();
        let qualifiers = words
            .iter()
            .filter(|w| w.chars().count() == QUALIFIER_WORD_CHARS)
            .filter_map(|w| WordPattern::new(w))
            .collect();

        Some(Self {
            display: name.trim().to_string(),
            char_len: phrase.text().chars().count(),
            phrase,
            continued,
            significant,
            qualifiers,
        })
    }

    /// The name as written in the catalog
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The lower-cased, trimmed name
    pub fn normalized(&self) -> &str {
        self.phrase.text()
    }

    /// Length of the normalized name in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn significant_words(&self) -> &[WordPattern] {
        &self.significant
    }

    /// Whether the whole name occurs at word boundaries in `text`
    pub fn is_exact_in(&self, text: &str) -> bool {
        self.phrase.is_match(text)
    }

    /// Whether the name occurs in `text` directly followed by another word
    pub fn is_continued_in(&self, text: &str) -> bool {
        self.continued.is_match(text)
    }

    /// Score this name against `text`, or `None` if it is not present
    pub fn score(&self, text: &str) -> Option<f64> {
        if self.char_len < SHORT_NAME_MAX_CHARS {
            return self.is_exact_in(text).then_some(SHORT_NAME_SCORE);
        }

        if self.is_exact_in(text) {
            return Some(EXACT_MATCH_SCORE);
        }

        if self.significant.is_empty() {
            return None;
        }

        let matched_qualifiers = self.qualifiers.iter().filter(|w| w.is_match(text)).count();
        if matched_qualifiers < self.qualifiers.len() {
            trace!(
                name = %self.display,
                matched_qualifiers,
                total_qualifiers = self.qualifiers.len(),
                "Rejected: qualifier words missing"
            );
            return None;
        }

        let matched = self.significant.iter().filter(|w| w.is_match(text)).count();
        let ratio = matched as f64 / self.significant.len() as f64;
        if ratio < required_ratio(self.significant.len()) {
            return None;
        }

        let score = ratio * PARTIAL_MATCH_CAP;
        trace!(
            name = %self.display,
            matched,
            total = self.significant.len(),
            score,
            "Word overlap match"
        );
        Some(score)
    }
}

/// Score a catalog name against text without keeping the compiled pattern
pub fn score(catalog_name: &str, text: &str) -> Option<f64> {
    NamePattern::compile(catalog_name)?.score(text)
}
