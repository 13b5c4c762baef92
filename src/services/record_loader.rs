use std::fs::File;
use std::io::Read;
use std::num::ParseFloatError;
use std::path::Path;

use encoding_rs::Encoding;
use thiserror::Error;

use crate::config::{LoaderSettings, RowPolicy};
use crate::models::{OazaRecord, Position};

/// Errors that can occur while loading oaza records
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("Input is not valid {encoding}")]
    Decode { encoding: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },

    #[error("Row {row}, column {column}: invalid coordinate {value:?}: {source}")]
    Parse {
        row: usize,
        column: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Row {row}, column {column}: coordinate {value:?} is not finite")]
    NonFinite {
        row: usize,
        column: usize,
        value: String,
    },
}

/// Reads oaza records from a delimited file in a legacy text encoding
///
/// Row 0 is treated as a header when configured, and rows at or beyond
/// `max_rows` are dropped. Any undecodable byte or unparsable or non-finite coordinate
/// aborts the whole load unless the row policy is [`RowPolicy::Skip`].
#[derive(Debug, Clone)]
pub struct RecordLoader {
    settings: LoaderSettings,
}

impl RecordLoader {
    pub fn new(settings: LoaderSettings) -> Self {
        Self { settings }
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<OazaRecord>, LoaderError> {
        tracing::debug!("Loading records from {}", path.as_ref().display());
        let file = File::open(path)?;
        self.load(file)
    }

    pub fn load<R: Read>(&self, mut source: R) -> Result<Vec<OazaRecord>, LoaderError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;

        let text = self.decode(&bytes)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.settings.delimiter)
            .from_reader(text.as_bytes());

        let first_row = usize::from(self.settings.skip_header);
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (row, result) in reader.records().enumerate() {
            if self.settings.max_rows.is_some_and(|max| row >= max) {
                break;
            }
            let row_fields = result?;
            if row < first_row {
                continue;
            }

            match self.parse_row(row, &row_fields) {
                Ok(record) => records.push(record),
                Err(e) if self.settings.row_policy == RowPolicy::Skip => {
                    tracing::warn!("Skipping row: {}", e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Loaded {} records ({} skipped)", records.len(), skipped);

        Ok(records)
    }

    fn decode<'b>(&self, bytes: &'b [u8]) -> Result<std::borrow::Cow<'b, str>, LoaderError> {
        let encoding = Encoding::for_label(self.settings.encoding.as_bytes())
            .ok_or_else(|| LoaderError::UnknownEncoding(self.settings.encoding.clone()))?;

        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or(LoaderError::Decode {
                encoding: encoding.name(),
            })
    }

    fn parse_row(&self, row: usize, fields: &csv::StringRecord) -> Result<OazaRecord, LoaderError> {
        let field = |column: usize| {
            fields
                .get(column)
                .ok_or(LoaderError::MissingColumn { row, column })
        };
        let coordinate = |column: usize| -> Result<f64, LoaderError> {
            let value = field(column)?;
            let parsed = value.parse::<f64>().map_err(|source| LoaderError::Parse {
                row,
                column,
                value: value.to_string(),
                source,
            })?;
            // `inf` and `NaN` parse, but no grid can be laid over them
            if !parsed.is_finite() {
                return Err(LoaderError::NonFinite {
                    row,
                    column,
                    value: value.to_string(),
                });
            }
            Ok(parsed)
        };

        let latitude = coordinate(self.settings.latitude_column)?;
        let longitude = coordinate(self.settings.longitude_column)?;

        Ok(OazaRecord::new(
            field(self.settings.name_column)?,
            field(self.settings.group_column)?,
            Position::new(latitude, longitude),
        ))
    }
}
