//! # Test Helper Library
//!
//! Shared fixture catalog and setup functions for the integration tests.

#![allow(dead_code)]

use halal_ingredients::{Catalog, IngredientAnalyzer, ProductAnalysis};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Fixture catalog covering codes, overlapping names and every status
pub const FIXTURE_CATALOG: &str = "e_code,status,name_ru,name_en,note
E471,halal,Моно- и диглицериды,Mono- and diglycerides,
E160a,halal,Каротины,Carotenes,
E120,haram,Кармин,Carmine,\"Из насекомых, кошениль\"
E322,mushbooh,Лецитин,Lecithin,
,halal,ароматизатор,flavouring,
,haram,ароматизатор пива,beer flavouring,
,mushbooh,Желатин,Gelatin,
,haram,Свиной жир,Lard,
,halal,Сахар,Sugar,
,halal,Соль,Salt,
,halal,Молоко,Milk,
,halal,Молоко сухое обезжиренное,Skimmed milk powder,
,unknown,Загуститель,Thickener,
";

/// Parse the fixture catalog into a shared handle
pub fn fixture_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::parse(FIXTURE_CATALOG).expect("fixture catalog should parse"))
}

pub fn fixture_analyzer() -> IngredientAnalyzer {
    IngredientAnalyzer::new(fixture_catalog())
}

/// Write catalog text to a file inside a fresh temporary directory
///
/// The directory must be kept alive for as long as the file is used.
pub fn write_catalog_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join("ingredients.csv");
    std::fs::write(&path, contents).expect("write catalog file");
    (dir, path)
}

/// Names of the detected ingredients in output order
pub fn detected_names(analysis: &ProductAnalysis) -> Vec<String> {
    analysis.ingredients.iter().map(|d| d.name.clone()).collect()
}
