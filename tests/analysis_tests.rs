//! # Analysis Integration Tests
//!
//! End-to-end checks of `IngredientAnalyzer::analyze` against the fixture
//! catalog, including the ordering and duplicate guarantees callers rely on.

mod test_helpers;

use halal_ingredients::{IngredientAnalyzer, IngredientStatus, MatchSource};
use std::collections::HashSet;
use std::sync::Arc;
use test_helpers::{detected_names, fixture_analyzer, fixture_catalog};

const SAMPLE_TEXTS: [&str; 8] = [
    "Состав: мука, сахар, эмульгатор E471.",
    "ароматизатор пива",
    "натуральный ароматизатор",
    "",
    "Состав: молоко сухое обезжиренное, сахар, соль, желатин, краситель кармин (E120)",
    "Ingredients: sugar, lard, lecithin (E322), salt, milk",
    "С0СТАВ: сахар,,, ;; e160a E160A мол0ко ?? ароматизатор",
    "ароматизатор, ароматизатор пива, сахар, сахар, СОЛЬ",
];

#[test]
fn test_e_code_scenario() {
    let analysis = fixture_analyzer().analyze("Состав: мука, сахар, эмульгатор E471.");

    let e471: Vec<_> = analysis
        .ingredients
        .iter()
        .filter(|d| d.matched_ingredient.as_ref().and_then(|i| i.e_code.as_deref()) == Some("E471"))
        .collect();
    assert_eq!(e471.len(), 1);
    assert_eq!(e471[0].source, MatchSource::Code);
    assert_eq!(e471[0].status, IngredientStatus::Halal);
    assert_eq!(analysis.overall_status, IngredientStatus::Halal);
    assert!(analysis.is_halal());
}

#[test]
fn test_longer_phrase_scenario() {
    let analysis = fixture_analyzer().analyze("ароматизатор пива");
    assert_eq!(detected_names(&analysis), vec!["ароматизатор пива"]);
    assert_eq!(analysis.overall_status, IngredientStatus::Haram);
    assert_eq!(analysis.haram_ingredients.len(), 1);
}

#[test]
fn test_shorter_phrase_scenario() {
    let analysis = fixture_analyzer().analyze("натуральный ароматизатор");
    assert_eq!(detected_names(&analysis), vec!["ароматизатор"]);
    assert_eq!(analysis.overall_status, IngredientStatus::Halal);
}

#[test]
fn test_empty_text_scenario() {
    let analysis = fixture_analyzer().analyze("");
    assert!(analysis.ingredients.is_empty());
    assert_eq!(analysis.overall_status, IngredientStatus::Unknown);
    assert!(!analysis.is_halal());
}

#[test]
fn test_code_case_insensitivity() {
    let analyzer = fixture_analyzer();
    for text in ["краситель e160a", "краситель E160A", "краситель E160a"] {
        let analysis = analyzer.analyze(text);
        assert_eq!(analysis.ingredients.len(), 1, "text: {}", text);
        let matched = analysis.ingredients[0].matched_ingredient.as_ref().unwrap();
        assert_eq!(matched.e_code.as_deref(), Some("E160a"));
    }
}

#[test]
fn test_mixed_label() {
    let analysis = fixture_analyzer().analyze(SAMPLE_TEXTS[4]);

    let names: HashSet<String> = detected_names(&analysis).into_iter().collect();
    assert!(names.contains("E120"));
    assert!(names.contains("Молоко сухое обезжиренное"));
    assert!(names.contains("Сахар"));
    assert!(names.contains("Соль"));
    assert!(names.contains("Желатин"));
    // The plain milk entry is part of the longer phrase
    assert!(!names.contains("Молоко"));

    assert_eq!(analysis.overall_status, IngredientStatus::Haram);
    assert_eq!(analysis.haram_ingredients.len(), 1);
    assert_eq!(analysis.mushbooh_ingredients.len(), 1);
}

#[test]
fn test_english_label() {
    let analysis = fixture_analyzer().analyze(SAMPLE_TEXTS[5]);
    assert_eq!(analysis.overall_status, IngredientStatus::Haram);
    assert!(analysis.haram_ingredients.iter().any(|d| d.name == "Lard"));
    assert!(analysis.mushbooh_ingredients.iter().any(|d| d.name == "E322"));
}

#[test]
fn test_unknown_status_member_is_not_halal() {
    let analysis = fixture_analyzer().analyze("сахар, загуститель");
    assert_eq!(analysis.ingredients.len(), 2);
    assert_eq!(analysis.overall_status, IngredientStatus::Unknown);
}

#[test]
fn test_analysis_is_deterministic() {
    let analyzer = fixture_analyzer();
    for text in SAMPLE_TEXTS {
        assert_eq!(analyzer.analyze(text), analyzer.analyze(text), "text: {}", text);
    }
}

#[test]
fn test_no_duplicate_ingredients() {
    let analyzer = fixture_analyzer();
    for text in SAMPLE_TEXTS {
        let analysis = analyzer.analyze(text);
        let mut seen = HashSet::new();
        for detected in &analysis.ingredients {
            let id = detected.ingredient_id().expect("only catalog-backed detections");
            assert!(seen.insert(id), "duplicate {:?} in {:?}", detected.name, text);
        }
    }
}

#[test]
fn test_status_lists_agree_with_overall_status() {
    let analyzer = fixture_analyzer();
    for text in SAMPLE_TEXTS {
        let analysis = analyzer.analyze(text);
        if !analysis.haram_ingredients.is_empty() {
            assert_eq!(analysis.overall_status, IngredientStatus::Haram, "text: {}", text);
        } else if !analysis.mushbooh_ingredients.is_empty() {
            assert_eq!(analysis.overall_status, IngredientStatus::Mushbooh, "text: {}", text);
        }
        for detected in &analysis.haram_ingredients {
            assert_eq!(detected.status, IngredientStatus::Haram);
        }
    }
}

#[test]
fn test_noise_never_fails() {
    let analyzer = fixture_analyzer();
    for text in ["@@@###", "1234567890", "ｅ１２０", "💥💥💥", "\n\t\r", "日本語のテキスト"] {
        let analysis = analyzer.analyze(text);
        assert_eq!(analysis.overall_status, IngredientStatus::Unknown, "text: {:?}", text);
    }
}

#[test]
fn test_empty_catalog_yields_unknown() {
    let analysis = IngredientAnalyzer::without_catalog().analyze(SAMPLE_TEXTS[4]);
    assert!(analysis.ingredients.is_empty());
    assert_eq!(analysis.overall_status, IngredientStatus::Unknown);
}

#[test]
fn test_concurrent_analysis_shares_catalog() {
    let analyzer = Arc::new(IngredientAnalyzer::new(fixture_catalog()));
    let expected = analyzer.analyze(SAMPLE_TEXTS[4]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            std::thread::spawn(move || analyzer.analyze(SAMPLE_TEXTS[4]))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_analysis_serializes_for_presentation() {
    let analysis = fixture_analyzer().analyze("ароматизатор пива");
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["overall_status"], "haram");
    assert_eq!(json["ingredients"][0]["name"], "ароматизатор пива");
    assert_eq!(json["ingredients"][0]["source"], "name");
}
