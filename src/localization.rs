//! Localized status labels and analysis summaries for the presentation layer.

use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

use crate::models::{IngredientStatus, ProductAnalysis};

/// Language used when the requested one is not supported
pub const DEFAULT_LANGUAGE: &str = "ru";

const RESOURCES: [(&str, &str); 2] = [
    ("ru", include_str!("../locales/ru/main.ftl")),
    ("en", include_str!("../locales/en/main.ftl")),
];

/// Fluent bundles for the supported label languages
pub struct StatusLabels {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl StatusLabels {
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();
        for (locale_str, source) in RESOURCES {
            let locale: LanguageIdentifier = locale_str.parse()?;
            bundles.insert(locale_str.to_string(), Self::create_bundle(locale, source)?);
        }
        Ok(Self { bundles })
    }

    fn create_bundle(
        locale: LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            anyhow!("Invalid Fluent resource for {}: {:?}", locale, errors)
        })?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            anyhow!("Failed to add Fluent resource for {}: {:?}", locale, errors)
        })?;
        Ok(bundle)
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Resolve a language tag such as "ru-RU" to a supported language
    pub fn detect_language(&self, language_code: Option<&str>) -> String {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(str::to_lowercase)
            .filter(|lang| self.is_language_supported(lang))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    fn message(&self, key: &str, language: &str, args: Option<&FluentArgs>) -> String {
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        else {
            return format!("Missing translation: {}", key);
        };
        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("Missing translation: {}", key);
        };

        let mut errors = vec![];
        bundle.format_pattern(pattern, args, &mut errors).into_owned()
    }

    /// Display label of a status, e.g. "Халяль"
    pub fn label(&self, status: IngredientStatus, language: &str) -> String {
        self.message(&format!("status-{}", status.keyword()), language, None)
    }

    /// One-line summary of an analysis
    pub fn summary(&self, analysis: &ProductAnalysis, language: &str) -> String {
        if analysis.ingredients.is_empty() {
            return self.message("analysis-nothing-found", language, None);
        }

        let counts = analysis.summary();
        let mut args = FluentArgs::new();
        args.set("status", FluentValue::from(self.label(analysis.overall_status, language)));
        args.set("total", FluentValue::from(counts.total));
        args.set("haram", FluentValue::from(counts.haram));
        args.set("mushbooh", FluentValue::from(counts.mushbooh));
        self.message("analysis-summary", language, Some(&args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetectedIngredient, MatchSource};

    #[test]
    fn test_status_labels() {
        let labels = StatusLabels::new().unwrap();
        assert_eq!(labels.label(IngredientStatus::Halal, "ru"), "Халяль");
        assert_eq!(labels.label(IngredientStatus::Mushbooh, "ru"), "Сомнительно");
        assert_eq!(labels.label(IngredientStatus::Haram, "en"), "Haram");
        assert_eq!(labels.label(IngredientStatus::Unknown, "en"), "Unknown");
    }

    #[test]
    fn test_unsupported_language_falls_back() {
        let labels = StatusLabels::new().unwrap();
        assert_eq!(labels.label(IngredientStatus::Haram, "de"), "Харам");
        assert_eq!(labels.detect_language(Some("en-US")), "en");
        assert_eq!(labels.detect_language(Some("ru_RU")), "ru");
        assert_eq!(labels.detect_language(Some("fr")), DEFAULT_LANGUAGE);
        assert_eq!(labels.detect_language(None), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_summary() {
        let labels = StatusLabels::new().unwrap();
        assert_eq!(
            labels.summary(&ProductAnalysis::empty(), "en"),
            "No ingredients recognized"
        );

        let mut analysis = ProductAnalysis::empty();
        analysis.ingredients.push(DetectedIngredient::new("сахар", None, MatchSource::Name));
        assert_eq!(
            labels.summary(&analysis, "en"),
            "Verdict: Unknown. Ingredients found: 1, haram: 0, doubtful: 0"
        );
    }
}
