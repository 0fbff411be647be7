//! # Halal Ingredients
//!
//! Analyzes product ingredient labels (Russian or English, possibly OCR-noisy)
//! against a reference catalog of food additives and ingredients, and
//! classifies the product as halal, haram, mushbooh (doubtful) or unknown.

pub mod aggregator;
pub mod analyzer;
pub mod catalog;
pub mod codes;
pub mod config;
pub mod errors;
pub mod localization;
pub mod matcher;
pub mod models;
pub mod observability;
pub mod resolver;

// Re-export types for easier access
pub use analyzer::IngredientAnalyzer;
pub use catalog::{Catalog, CatalogLoader, CatalogSource, FileCatalogSource, StaticCatalogSource};
pub use errors::{AppError, AppResult, CatalogLoadError};
pub use models::{
    DetectedIngredient, Ingredient, IngredientId, IngredientStatus, MatchSource, ProductAnalysis,
};
