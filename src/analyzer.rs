//! # Ingredient Analyzer
//!
//! Entry point of the engine: turns label text into a [`ProductAnalysis`].
//!
//! ## Processing Flow
//!
//! ```text
//! text ─┬─ extract_codes ──── catalog code lookup ──┐
//!       └─ NamePattern::score per catalog name ─────┴─ resolve ─ aggregate
//! ```
//!
//! Catalog entries claimed by an additive code are not name-matched again.
//! The analyzer holds a shared, read-only catalog handle and keeps no other
//! state, so one instance can serve concurrent calls.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info_span};

use crate::aggregator::build_analysis;
use crate::catalog::Catalog;
use crate::codes::extract_codes;
use crate::errors::error_logging;
use crate::matcher::{NamePattern, EXACT_MATCH_SCORE};
use crate::models::{DetectedIngredient, MatchSource, ProductAnalysis};
use crate::observability;
use crate::resolver::{resolve, Candidate};

/// Separator used when joining several recognized pages
pub const PAGE_SEPARATOR: &str = " ";

/// Analyzes ingredient lists against a loaded catalog
#[derive(Debug, Clone)]
pub struct IngredientAnalyzer {
    catalog: Arc<Catalog>,
}

impl IngredientAnalyzer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Analyzer over an empty catalog; every analysis is unknown
    pub fn without_catalog() -> Self {
        Self::new(Arc::new(Catalog::empty()))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Analyze one ingredients label
    pub fn analyze(&self, text: &str) -> ProductAnalysis {
        let span = info_span!("analyze", text_len = text.len());
        let _guard = span.enter();
        let started = Instant::now();

        let mut candidates = Vec::new();
        let claimed_codes = self.code_candidates(text, &mut candidates);
        let code_matches = candidates.len();
        self.name_candidates(text, &claimed_codes, &mut candidates);

        debug!(
            code_matches,
            name_matches = candidates.len() - code_matches,
            "Collected candidates"
        );

        let detected: Vec<DetectedIngredient> = resolve(candidates, text)
            .into_iter()
            .map(|c| DetectedIngredient::new(c.name(), Some(c.ingredient.clone()), c.source))
            .collect();

        let analysis = build_analysis(detected);
        debug!(
            detected = analysis.ingredients.len(),
            overall_status = %analysis.overall_status,
            "Analysis complete"
        );
        observability::record_analysis_metrics(&analysis, started.elapsed());
        analysis
    }

    /// Analyze text recognized from several images of the same label
    ///
    /// Empty pages are skipped and the rest joined with a single space.
    pub fn analyze_pages<S: AsRef<str>>(&self, pages: &[S]) -> ProductAnalysis {
        let text = pages
            .iter()
            .map(|page| page.as_ref().trim())
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);
        self.analyze(&text)
    }

    /// Run [`IngredientAnalyzer::analyze`] on the blocking thread pool
    ///
    /// A panicked or cancelled worker yields an empty, unknown analysis.
    pub async fn analyze_in_background(self: &Arc<Self>, text: String) -> ProductAnalysis {
        let analyzer = Arc::clone(self);
        match tokio::task::spawn_blocking(move || analyzer.analyze(&text)).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error_logging::log_internal_error(&e, "analyzer", "analyze_in_background");
                ProductAnalysis::empty()
            }
        }
    }

    /// Push code matches found in the catalog; returns the claimed codes
    fn code_candidates<'a>(&'a self, text: &str, out: &mut Vec<Candidate<'a>>) -> HashSet<String> {
        let mut claimed = HashSet::new();
        for code in extract_codes(text) {
            let Some(ingredient) = self.catalog.find_by_code(&code) else {
                continue;
            };
            let Some(pattern) = NamePattern::compile(&code) else {
                continue;
            };
            out.push(Candidate::new(
                ingredient,
                Cow::Owned(pattern),
                EXACT_MATCH_SCORE,
                MatchSource::Code,
            ));
            claimed.insert(code);
        }
        claimed
    }

    fn name_candidates<'a>(
        &'a self,
        text: &str,
        claimed_codes: &HashSet<String>,
        out: &mut Vec<Candidate<'a>>,
    ) {
        for entry in self.catalog.entries() {
            let ingredient = entry.ingredient();
            if ingredient
                .canonical_code()
                .is_some_and(|code| claimed_codes.contains(&code))
            {
                continue;
            }
            for pattern in entry.names() {
                if let Some(score) = pattern.score(text) {
                    out.push(Candidate::new(
                        ingredient,
                        Cow::Borrowed(pattern),
                        score,
                        MatchSource::Name,
                    ));
                }
            }
        }
    }
}
