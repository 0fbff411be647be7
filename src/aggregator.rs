//! Merges detected ingredients into a product verdict.

use crate::models::{DetectedIngredient, IngredientStatus, ProductAnalysis};

/// Overall status of a set of detections
///
/// Haram dominates, then mushbooh. A product is halal only when something was
/// detected and every detection is halal; anything else is unknown.
pub fn aggregate(detected: &[DetectedIngredient]) -> IngredientStatus {
    let any = |status| detected.iter().any(|d| d.status == status);

    if any(IngredientStatus::Haram) {
        IngredientStatus::Haram
    } else if any(IngredientStatus::Mushbooh) {
        IngredientStatus::Mushbooh
    } else if !detected.is_empty() && detected.iter().all(|d| d.status == IngredientStatus::Halal) {
        IngredientStatus::Halal
    } else {
        IngredientStatus::Unknown
    }
}

/// Wrap the final detections into a [`ProductAnalysis`]
pub fn build_analysis(detected: Vec<DetectedIngredient>) -> ProductAnalysis {
    let with_status = |status| {
        detected
            .iter()
            .filter(|d| d.status == status)
            .cloned()
            .collect::<Vec<_>>()
    };

    let haram_ingredients = with_status(IngredientStatus::Haram);
    let mushbooh_ingredients = with_status(IngredientStatus::Mushbooh);
    let overall_status = aggregate(&detected);

    ProductAnalysis {
        ingredients: detected,
        overall_status,
        haram_ingredients,
        mushbooh_ingredients,
    }
}
