//! # Catalog Loading Integration Tests
//!
//! Load-once behaviour of `CatalogLoader` over real files.

mod test_helpers;

use halal_ingredients::{
    CatalogLoadError, CatalogLoader, FileCatalogSource, IngredientAnalyzer, IngredientStatus,
    StaticCatalogSource,
};
use std::sync::Arc;
use test_helpers::{write_catalog_file, FIXTURE_CATALOG};

#[tokio::test]
async fn test_second_load_survives_removed_file() {
    let (_dir, path) = write_catalog_file(FIXTURE_CATALOG);
    let loader = CatalogLoader::new(FileCatalogSource::new(&path));

    let first = loader.load().await.unwrap();
    std::fs::remove_file(&path).unwrap();
    let second = loader.load().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 13);
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let loader = CatalogLoader::new(FileCatalogSource::new(dir.path().join("absent.csv")));
    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, CatalogLoadError::NotFound(_)));
}

#[tokio::test]
async fn test_header_only_file_is_invalid() {
    let (_dir, path) = write_catalog_file("e_code,status,name_ru,name_en,note\n");
    let loader = CatalogLoader::new(FileCatalogSource::new(&path));
    assert!(matches!(loader.load().await, Err(CatalogLoadError::InvalidFormat(_))));
}

#[tokio::test]
async fn test_non_utf8_file_fails_to_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ingredients.csv");
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let loader = CatalogLoader::new(FileCatalogSource::new(&path));
    assert!(matches!(loader.load().await, Err(CatalogLoadError::ReadFailed(_))));
}

#[tokio::test]
async fn test_quoted_fields_and_bad_rows() {
    let contents = "e_code,status,name_ru,name_en,note
E120,haram,Кармин,Carmine,\"Из насекомых, кошениль\"
E999,forbidden,Что-то,Something,
broken row
,halal,\"Соль, поваренная\",Table salt,
";
    let (_dir, path) = write_catalog_file(contents);
    let catalog = CatalogLoader::new(FileCatalogSource::new(&path)).load().await.unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.skipped_rows(), 2);
    let names: Vec<_> = catalog.iter().map(|i| i.name_ru.as_str()).collect();
    assert_eq!(names, vec!["Кармин", "Соль, поваренная"]);
    assert_eq!(
        catalog.find_by_code("e120").unwrap().note.as_deref(),
        Some("Из насекомых, кошениль")
    );
}

#[tokio::test]
async fn test_loaded_catalog_drives_analysis() {
    let loader = CatalogLoader::new(StaticCatalogSource::new("fixture", FIXTURE_CATALOG));
    let analyzer = IngredientAnalyzer::new(loader.load().await.unwrap());

    let analysis = analyzer.analyze("желатин, сахар");
    assert_eq!(analysis.overall_status, IngredientStatus::Mushbooh);
    assert_eq!(analysis.ingredients.len(), 2);
}

#[tokio::test]
async fn test_bundled_catalog_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/ingredients.csv");
    let catalog = CatalogLoader::new(FileCatalogSource::new(path)).load().await.unwrap();
    assert!(!catalog.is_empty());
    assert_eq!(catalog.skipped_rows(), 0);
}
