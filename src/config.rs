use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchSettings,
    #[serde(default)]
    pub loader: LoaderSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchSettings {
    /// Latitude half-extent of the window, also the latitude grid step
    #[serde(default = "default_window")]
    #[validate(range(exclusive_min = 0.0))]
    pub width: f64,
    /// Longitude half-extent of the window, also the longitude grid step
    #[serde(default = "default_window")]
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            width: default_window(),
            height: default_window(),
            parallel: false,
        }
    }
}

fn default_window() -> f64 { 0.01 }

/// What to do with a data row whose columns cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Abort the whole load
    #[default]
    Strict,
    /// Log and drop the row
    Skip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderSettings {
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: u8,
    #[serde(default = "default_true")]
    pub skip_header: bool,
    /// Rows at or beyond this index are ignored
    #[serde(default)]
    pub max_rows: Option<usize>,
    #[serde(default = "default_group_column")]
    pub group_column: usize,
    #[serde(default = "default_name_column")]
    pub name_column: usize,
    #[serde(default = "default_latitude_column")]
    pub latitude_column: usize,
    #[serde(default = "default_longitude_column")]
    pub longitude_column: usize,
    #[serde(default)]
    pub row_policy: RowPolicy,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            delimiter: default_delimiter(),
            skip_header: true,
            max_rows: None,
            group_column: default_group_column(),
            name_column: default_name_column(),
            latitude_column: default_latitude_column(),
            longitude_column: default_longitude_column(),
            row_policy: RowPolicy::Strict,
        }
    }
}

fn default_encoding() -> String { "Shift_JIS".to_string() }
fn default_delimiter() -> u8 { b',' }
fn default_true() -> bool { true }
fn default_group_column() -> usize { 3 }
fn default_name_column() -> usize { 5 }
fn default_latitude_column() -> usize { 6 }
fn default_longitude_column() -> usize { 7 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "warn".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local config file (config/local.toml)
    /// 4. Explicit config file, if given
    /// 5. Environment variables (prefixed with OAZA__)
    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder
            // e.g., OAZA__SEARCH__WIDTH -> search.width
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path only, plus environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("OAZA")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
