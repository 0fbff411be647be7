//! # Analysis Data Model
//!
//! Catalog records and the result types handed to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Halal classification of an ingredient or a whole product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientStatus {
    Halal,
    Haram,
    Mushbooh,
    Unknown,
}

impl IngredientStatus {
    /// Parse a catalog status keyword (`halal`, `haram`, `mushbooh`, `unknown`)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_lowercase().as_str() {
            "halal" => Some(IngredientStatus::Halal),
            "haram" => Some(IngredientStatus::Haram),
            "mushbooh" => Some(IngredientStatus::Mushbooh),
            "unknown" => Some(IngredientStatus::Unknown),
            _ => None,
        }
    }

    /// The catalog keyword for this status
    pub fn keyword(&self) -> &'static str {
        match self {
            IngredientStatus::Halal => "halal",
            IngredientStatus::Haram => "haram",
            IngredientStatus::Mushbooh => "mushbooh",
            IngredientStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IngredientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Stable identity of a catalog entry, assigned in load order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngredientId(pub u32);

/// One entry of the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    /// Additive code as written in the catalog (e.g. "E160a")
    pub e_code: Option<String>,
    pub status: IngredientStatus,
    pub name_ru: String,
    pub name_en: String,
    pub note: Option<String>,
}

impl Ingredient {
    /// Upper-cased additive code used for lookups
    pub fn canonical_code(&self) -> Option<String> {
        self.e_code.as_ref().map(|code| code.trim().to_uppercase())
    }
}

/// How an ingredient was recognized in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Additive code token such as "E471"
    Code,
    /// Russian or English catalog name
    Name,
}

/// An ingredient recognized in the analyzed text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedIngredient {
    /// The name (or code token) as it was matched
    pub name: String,
    pub matched_ingredient: Option<Ingredient>,
    pub status: IngredientStatus,
    pub source: MatchSource,
}

impl DetectedIngredient {
    pub fn new(name: impl Into<String>, matched: Option<Ingredient>, source: MatchSource) -> Self {
        let status = matched
            .as_ref()
            .map(|ingredient| ingredient.status)
            .unwrap_or(IngredientStatus::Unknown);
        Self {
            name: name.into(),
            matched_ingredient: matched,
            status,
            source,
        }
    }

    pub fn ingredient_id(&self) -> Option<IngredientId> {
        self.matched_ingredient.as_ref().map(|ingredient| ingredient.id)
    }
}

/// Result of analyzing one product label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAnalysis {
    pub ingredients: Vec<DetectedIngredient>,
    pub overall_status: IngredientStatus,
    pub haram_ingredients: Vec<DetectedIngredient>,
    pub mushbooh_ingredients: Vec<DetectedIngredient>,
}

impl ProductAnalysis {
    /// Nothing detected, status unknown
    pub fn empty() -> Self {
        Self {
            ingredients: Vec::new(),
            overall_status: IngredientStatus::Unknown,
            haram_ingredients: Vec::new(),
            mushbooh_ingredients: Vec::new(),
        }
    }

    pub fn is_halal(&self) -> bool {
        self.overall_status == IngredientStatus::Halal
            && self.haram_ingredients.is_empty()
            && self.mushbooh_ingredients.is_empty()
    }

    /// Per-status counts of the detected ingredients
    pub fn summary(&self) -> AnalysisSummary {
        let count = |status| self.ingredients.iter().filter(|d| d.status == status).count();
        AnalysisSummary {
            total: self.ingredients.len(),
            halal: count(IngredientStatus::Halal),
            haram: count(IngredientStatus::Haram),
            mushbooh: count(IngredientStatus::Mushbooh),
            unknown: count(IngredientStatus::Unknown),
        }
    }
}

/// Counts of detected ingredients by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub halal: usize,
    pub haram: usize,
    pub mushbooh: usize,
    pub unknown: usize,
}
