//! # Overlap Resolution
//!
//! Catalog names overlap heavily: "ароматизатор" is a substring of
//! "ароматизатор пива", "молоко" of "молоко сухое". When both names of such a
//! pair are candidates, the text usually mentions only one of them. This
//! module decides which.
//!
//! ## Algorithm Overview
//!
//! 1. Drop candidates scoring below [`MIN_CANDIDATE_SCORE`].
//! 2. Order by score (descending), then by name length (ascending).
//! 3. For every pair where one normalized name is a strict substring of the
//!    other, gather [`PairFacts`] and run [`OVERLAP_RULES`] in order. The
//!    first rule that fires names a winner; the loser is eliminated and takes
//!    no further part in comparisons.
//! 4. Emit survivors in order, keeping the first candidate per ingredient.
//!
//! Pairs no rule decides leave both candidates in place.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::matcher::NamePattern;
use crate::models::{Ingredient, MatchSource};

/// Candidates scoring below this are discarded before resolution
pub const MIN_CANDIDATE_SCORE: f64 = 0.7;
/// Score lead the longer name needs when neither name is exact
pub const SCORE_GAP: f64 = 0.1;
/// Character lead the longer name needs when neither name is exact
pub const MIN_LENGTH_GAIN: usize = 2;

/// A provisional match of one catalog name (or code) against the text
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub ingredient: &'a Ingredient,
    pub pattern: Cow<'a, NamePattern>,
    pub score: f64,
    pub source: MatchSource,
}

impl<'a> Candidate<'a> {
    pub fn new(
        ingredient: &'a Ingredient,
        pattern: Cow<'a, NamePattern>,
        score: f64,
        source: MatchSource,
    ) -> Self {
        Self {
            ingredient,
            pattern,
            score,
            source,
        }
    }

    /// The matched name as written in the catalog (or the code token)
    pub fn name(&self) -> &str {
        self.pattern.display()
    }

    /// Whether this candidate's name is a strict substring of `other`'s
    fn is_contained_in(&self, other: &Candidate<'_>) -> bool {
        self.pattern.char_len() < other.pattern.char_len()
            && other.pattern.normalized().contains(self.pattern.normalized())
    }
}

/// Which side of an overlapping pair survives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    KeepShorter,
    KeepLonger,
}

/// Everything the rules need to know about an overlapping pair
///
/// "Shorter" is the candidate whose name is contained in the "longer" one.
/// Extra words are the longer name's significant words the shorter lacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairFacts {
    pub shorter_exact: bool,
    pub longer_exact: bool,
    /// The shorter name is followed by another word somewhere in the text
    pub shorter_continued: bool,
    pub shorter_score: f64,
    pub longer_score: f64,
    /// Character length difference between the two names
    pub length_gain: usize,
    pub extra_words: usize,
    pub extra_words_present: usize,
}

impl PairFacts {
    /// Gather facts for a pair against the analyzed text
    pub fn gather(
        shorter: &Candidate<'_>,
        longer: &Candidate<'_>,
        shorter_exact: bool,
        longer_exact: bool,
        text: &str,
    ) -> Self {
        let shorter_words: HashSet<&str> = shorter
            .pattern
            .significant_words()
            .iter()
            .map(|w| w.text())
            .collect();
        let mut seen = HashSet::new();
        let extras: Vec<_> = longer
            .pattern
            .significant_words()
            .iter()
            .filter(|w| !shorter_words.contains(w.text()) && seen.insert(w.text()))
            .collect();

        Self {
            shorter_exact,
            longer_exact,
            shorter_continued: shorter.pattern.is_continued_in(text),
            shorter_score: shorter.score,
            longer_score: longer.score,
            length_gain: longer.pattern.char_len() - shorter.pattern.char_len(),
            extra_words: extras.len(),
            extra_words_present: extras.iter().filter(|w| w.is_match(text)).count(),
        }
    }

    /// Every extra word occurs in the text (vacuously true without extras)
    pub fn all_extra_words_present(&self) -> bool {
        self.extra_words_present == self.extra_words
    }

    /// The longer name has extra words and none of them occurs in the text
    pub fn no_extra_words_present(&self) -> bool {
        self.extra_words > 0 && self.extra_words_present == 0
    }
}

/// One row of the overlap decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapRule {
    /// The shorter name is exact and the longer one is not
    ShorterExactOnly,
    /// The shorter name is exact and the longer name's extra words are missing
    ShorterExactWithoutExtras,
    /// The shorter name starts a longer phrase and the longer name is not exact
    ShorterStartsPhrase,
    /// The longer name is exact and the shorter one is not
    LongerExactOnly,
    /// The longer name is exact and all its extra words are present
    LongerExactWithExtras,
    /// Neither is exact but the longer name clearly scores better
    LongerClearlyStronger,
    /// None of the longer name's extra words occur in the text
    ExtrasAbsent,
    /// Both are exact; higher score wins, the shorter name on ties
    BothExact,
}

/// Rules in evaluation order; the first one that fires decides
pub const OVERLAP_RULES: [OverlapRule; 8] = [
    OverlapRule::ShorterExactOnly,
    OverlapRule::ShorterExactWithoutExtras,
    OverlapRule::ShorterStartsPhrase,
    OverlapRule::LongerExactOnly,
    OverlapRule::LongerExactWithExtras,
    OverlapRule::LongerClearlyStronger,
    OverlapRule::ExtrasAbsent,
    OverlapRule::BothExact,
];

impl OverlapRule {
    pub fn name(&self) -> &'static str {
        match self {
            OverlapRule::ShorterExactOnly => "shorter_exact_only",
            OverlapRule::ShorterExactWithoutExtras => "shorter_exact_without_extras",
            OverlapRule::ShorterStartsPhrase => "shorter_starts_phrase",
            OverlapRule::LongerExactOnly => "longer_exact_only",
            OverlapRule::LongerExactWithExtras => "longer_exact_with_extras",
            OverlapRule::LongerClearlyStronger => "longer_clearly_stronger",
            OverlapRule::ExtrasAbsent => "extras_absent",
            OverlapRule::BothExact => "both_exact",
        }
    }

    /// Apply this rule alone; `None` means it does not fire
    pub fn apply(&self, f: &PairFacts) -> Option<Verdict> {
        let fires = match self {
            OverlapRule::ShorterExactOnly => f.shorter_exact && !f.longer_exact,
            OverlapRule::ShorterExactWithoutExtras => {
                f.shorter_exact && !f.all_extra_words_present()
            }
            OverlapRule::ShorterStartsPhrase => f.shorter_continued && !f.longer_exact,
            OverlapRule::LongerExactOnly => f.longer_exact && !f.shorter_exact,
            OverlapRule::LongerExactWithExtras => f.longer_exact && f.all_extra_words_present(),
            OverlapRule::LongerClearlyStronger => {
                !f.shorter_exact
                    && !f.longer_exact
                    && f.longer_score > f.shorter_score + SCORE_GAP
                    && f.length_gain > MIN_LENGTH_GAIN
                    && f.all_extra_words_present()
            }
            OverlapRule::ExtrasAbsent => f.no_extra_words_present(),
            OverlapRule::BothExact => f.shorter_exact && f.longer_exact,
        };
        if !fires {
            return None;
        }

        Some(match self {
            OverlapRule::ShorterExactOnly
            | OverlapRule::ShorterExactWithoutExtras
            | OverlapRule::ShorterStartsPhrase
            | OverlapRule::ExtrasAbsent => Verdict::KeepShorter,
            OverlapRule::LongerExactOnly
            | OverlapRule::LongerExactWithExtras
            | OverlapRule::LongerClearlyStronger => Verdict::KeepLonger,
            OverlapRule::BothExact => {
                if f.longer_score > f.shorter_score {
                    Verdict::KeepLonger
                } else {
                    Verdict::KeepShorter
                }
            }
        })
    }
}

/// Run the decision table over a pair
pub fn decide(facts: &PairFacts) -> Option<(OverlapRule, Verdict)> {
    OVERLAP_RULES
        .iter()
        .find_map(|rule| rule.apply(facts).map(|verdict| (*rule, verdict)))
}

fn by_score_then_length(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.pattern.char_len().cmp(&b.pattern.char_len()))
}

/// Resolve overlapping candidates into the final, deduplicated match list
///
/// Deterministic for identical input: sorting is stable and pairs are
/// visited in a fixed order.
pub fn resolve<'a>(candidates: Vec<Candidate<'a>>, text: &str) -> Vec<Candidate<'a>> {
    let total = candidates.len();
    let mut pool: Vec<Candidate<'a>> = candidates
        .into_iter()
        .filter(|c| c.score >= MIN_CANDIDATE_SCORE)
        .collect();
    pool.sort_by(by_score_then_length);

    debug!(
        candidates = total,
        above_threshold = pool.len(),
        "Resolving candidate overlaps"
    );

    let exact: Vec<bool> = pool.iter().map(|c| c.pattern.is_exact_in(text)).collect();
    let mut eliminated = vec![false; pool.len()];

    for i in 0..pool.len() {
        if eliminated[i] {
            continue;
        }
        for j in 0..pool.len() {
            if i == j || eliminated[j] || pool[i].ingredient.id == pool[j].ingredient.id {
                continue;
            }

            let (shorter, longer) = if pool[i].is_contained_in(&pool[j]) {
                (i, j)
            } else if pool[j].is_contained_in(&pool[i]) {
                (j, i)
            } else {
                continue;
            };

            let facts = PairFacts::gather(
                &pool[shorter],
                &pool[longer],
                exact[shorter],
                exact[longer],
                text,
            );
            let Some((rule, verdict)) = decide(&facts) else {
                trace!(
                    shorter = %pool[shorter].name(),
                    longer = %pool[longer].name(),
                    "Overlap undecided, keeping both"
                );
                continue;
            };

            let loser = match verdict {
                Verdict::KeepShorter => longer,
                Verdict::KeepLonger => shorter,
            };
            trace!(
                shorter = %pool[shorter].name(),
                longer = %pool[longer].name(),
                rule = rule.name(),
                dropped = %pool[loser].name(),
                "Overlap decided"
            );
            eliminated[loser] = true;
            if loser == i {
                break;
            }
        }
    }

    let mut seen = HashSet::new();
    pool.into_iter()
        .zip(eliminated)
        .filter(|(_, dropped)| !dropped)
        .map(|(candidate, _)| candidate)
        .filter(|candidate| seen.insert(candidate.ingredient.id))
        .collect()
}
