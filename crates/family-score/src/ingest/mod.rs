//! Decoding of uploaded transaction tables into typed [`Transaction`] rows.

mod cell;
mod normalizer;
mod parser;
mod record;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::scoring::{FamilyId, Transaction};

/// Tabular source formats the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Resolves a format from the text after the last `.` of a file name.
    ///
    /// A name without a dot is treated as its own extension, so `data` is
    /// rejected as the unsupported format `data`.
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = file_name.rsplit('.').next().unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn from_extension(extension: &str) -> Result<Self, IngestError> {
        let extension = extension.trim().to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(IngestError::UnsupportedFormat { extension }),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },
    #[error("failed to read transaction data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported JSON layout: {0}")]
    JsonLayout(String),
    #[error(
        "malformed record at row {row} (family {}): field '{field}' {reason}",
        describe_family(.family)
    )]
    MalformedRecord {
        row: usize,
        family: Option<FamilyId>,
        field: &'static str,
        reason: String,
    },
}

fn describe_family(family: &Option<FamilyId>) -> String {
    match family {
        Some(family_id) => family_id.to_string(),
        None => "unknown".to_string(),
    }
}

/// Entry point for turning tabular documents into transactions.
pub struct TransactionDecoder;

impl TransactionDecoder {
    /// Opens `path` and decodes it according to its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, IngestError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = SourceFormat::from_file_name(&file_name)?;
        let file = File::open(path)?;
        Self::from_reader(format, BufReader::new(file))
    }

    /// Decodes a whole document. Any malformed row fails the batch.
    pub fn from_reader<R: Read>(
        format: SourceFormat,
        reader: R,
    ) -> Result<Vec<Transaction>, IngestError> {
        let transactions = match format {
            SourceFormat::Csv => parser::parse_csv(reader)?,
            SourceFormat::Json => parser::parse_json(reader)?,
        };

        debug!(
            format = format.extension(),
            rows = transactions.len(),
            "decoded transaction rows"
        );

        Ok(transactions)
    }

    /// Decodes JSON row objects that arrive already split, e.g. inside a
    /// request envelope. Rows get the same validation as a JSON document.
    pub fn from_records(rows: Vec<serde_json::Value>) -> Result<Vec<Transaction>, IngestError> {
        let transactions = parser::parse_json_rows(rows)?;
        debug!(rows = transactions.len(), "decoded transaction records");
        Ok(transactions)
    }
}
