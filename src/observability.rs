//! Observability module for logging setup and engine metrics.
//!
//! This module provides:
//! - Structured logging with configurable level and format
//! - Metrics recording for catalog loads and analyses
//!
//! Metrics go through the `metrics` facade; they are no-ops until the host
//! application installs a recorder.

use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::config::{LogFormat, LoggingConfig};
use crate::models::ProductAnalysis;

/// Initialize structured logging with tracing
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("halal_ingredients={}", config.level).parse()?)
        .add_directive(format!("halal_scan={}", config.level).parse()?);

    let installed = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            log_level = %config.level,
            log_format = ?config.format,
            "Tracing initialized with structured logging"
        );
    }
    Ok(())
}

/// Record catalog load outcome
pub fn record_catalog_load_metrics(success: bool, skipped_rows: usize) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("catalog_loads_total", "result" => result).increment(1);
    metrics::counter!("catalog_rows_skipped_total").increment(skipped_rows as u64);
}

/// Record one completed analysis
pub fn record_analysis_metrics(analysis: &ProductAnalysis, duration: Duration) {
    metrics::counter!("ingredient_analyses_total", "status" => analysis.overall_status.keyword())
        .increment(1);
    metrics::histogram!("ingredient_analysis_duration_seconds").record(duration.as_secs_f64());
    metrics::histogram!("ingredient_detected_count").record(analysis.ingredients.len() as f64);
}
