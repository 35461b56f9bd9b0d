use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Read;

use super::normalizer::normalize_header;
use super::record::RawRow;
use super::IngestError;
use crate::scoring::Transaction;

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader.headers()?.iter().map(normalize_header).collect();
    csv_reader.set_headers(headers);

    let mut transactions = Vec::new();
    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row = record?;
        transactions.push(row.into_transaction(index + 1)?);
    }

    Ok(transactions)
}

/// Accepts an array of row objects or an object of columns keyed by row index.
pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<Transaction>, IngestError> {
    let document: Value = serde_json::from_reader(reader)?;
    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(columns) => rows_from_columns(columns)?,
        other => {
            return Err(IngestError::JsonLayout(format!(
                "expected an array of records or an object of columns, found {}",
                describe(&other)
            )))
        }
    };

    parse_json_rows(rows)
}

/// Validates already-split JSON row objects, numbering them from 1.
pub(crate) fn parse_json_rows(rows: Vec<Value>) -> Result<Vec<Transaction>, IngestError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let row_number = index + 1;
            let fields = match row {
                Value::Object(fields) => fields,
                other => {
                    return Err(IngestError::JsonLayout(format!(
                        "row {row_number} is {} rather than an object",
                        describe(&other)
                    )))
                }
            };

            let normalized: Map<String, Value> = fields
                .into_iter()
                .map(|(key, value)| (normalize_header(&key), value))
                .collect();
            let raw: RawRow = serde_json::from_value(Value::Object(normalized))?;
            raw.into_transaction(row_number)
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum RowKey {
    Position(u64),
    Label(String),
}

impl RowKey {
    fn parse(key: &str) -> Self {
        key.trim()
            .parse::<u64>()
            .map(Self::Position)
            .unwrap_or_else(|_| Self::Label(key.to_string()))
    }
}

fn rows_from_columns(columns: Map<String, Value>) -> Result<Vec<Value>, IngestError> {
    let mut rows: BTreeMap<RowKey, Map<String, Value>> = BTreeMap::new();

    for (column, cells) in columns {
        match cells {
            Value::Object(cells) => {
                for (key, cell) in cells {
                    rows.entry(RowKey::parse(&key))
                        .or_default()
                        .insert(column.clone(), cell);
                }
            }
            Value::Array(cells) => {
                for (position, cell) in cells.into_iter().enumerate() {
                    rows.entry(RowKey::Position(position as u64))
                        .or_default()
                        .insert(column.clone(), cell);
                }
            }
            other => {
                return Err(IngestError::JsonLayout(format!(
                    "column '{column}' holds {} instead of row values",
                    describe(&other)
                )))
            }
        }
    }

    Ok(rows.into_values().map(Value::Object).collect())
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
