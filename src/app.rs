use std::io::Read;

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::config::Settings;
use crate::core::{bounding_box, CongestionFinder, SearchError};
use crate::models::CongestionReport;
use crate::services::{LoaderError, RecordLoader};

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Failed to load records: {0}")]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("No records to search")]
    EmptyInput,
}

/// Load records from `source`, search them, and summarise the best candidate
///
/// Nothing is reported unless every stage succeeds.
pub fn run<R: Read>(settings: &Settings, source: R) -> Result<CongestionReport, AppError> {
    settings.validate()?;
    let finder = CongestionFinder::new(settings.search.width, settings.search.height)?;

    let records = RecordLoader::new(settings.loader.clone()).load(source)?;
    let bounds = bounding_box(&records).ok_or(AppError::EmptyInput)?;

    tracing::info!(
        "Bounding box ({}, {}) - ({}, {})",
        bounds.min.latitude,
        bounds.min.longitude,
        bounds.max.latitude,
        bounds.max.longitude
    );

    let result = if settings.search.parallel {
        finder.search_parallel(&records, &bounds)
    } else {
        finder.search(&records, &bounds)
    };

    tracing::info!(
        "Most congested point ({}, {}) covers {} of {} records",
        result.center.latitude,
        result.center.longitude,
        result.count(),
        records.len()
    );

    Ok(CongestionReport::from(&result))
}
