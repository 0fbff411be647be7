use anyhow::Result;
use halal_ingredients::config::{self, EngineConfig, LoggingConfig};
use halal_ingredients::errors::error_logging;
use halal_ingredients::localization::StatusLabels;
use halal_ingredients::observability;
use halal_ingredients::{Catalog, CatalogLoader, FileCatalogSource, IngredientAnalyzer};
use std::env;
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};

/// Label text from the command line, or stdin when no arguments are given
fn read_input() -> Result<String> {
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Settings are unusable, so log through the default subscriber
            observability::init_tracing(&LoggingConfig::default())?;
            error_logging::log_config_error(&e, config::ENV_VARIABLES, "from_env");
            return Err(e.into());
        }
    };
    observability::init_tracing(&config.logging)?;
    info!(config = %config, "Starting halal-scan");

    let loader = CatalogLoader::new(FileCatalogSource::new(&config.catalog.path));
    let catalog = match loader.load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, "Continuing with an empty catalog");
            Arc::new(Catalog::empty())
        }
    };

    let analyzer = Arc::new(IngredientAnalyzer::new(catalog));
    let text = read_input()?;
    let analysis = analyzer.analyze_in_background(text).await;

    let labels = StatusLabels::new()?;
    let language = labels.detect_language(env::var("LANG").ok().as_deref());

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    println!("{}", labels.summary(&analysis, &language));

    Ok(())
}
