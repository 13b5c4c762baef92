//! Oaza Congestion - finds the most oaza-dense point in a region
//!
//! This library provides a brute-force grid search that locates the point
//! surrounded by the largest number of named sub-municipal areas (oaza),
//! together with the loader that reads them from a legacy-encoded CSV file.

pub mod app;
pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use app::{run, AppError};
pub use crate::core::{bounding_box, CongestionFinder, SearchError, SearchResult};
pub use models::{BoundingBox, CongestionReport, OazaRecord, Position, Window};
pub use services::{LoaderError, RecordLoader};
