use serde::de::{self, Deserialize, Deserializer, Visitor};
use std::fmt;

/// Loosely typed cell as produced by CSV type inference or a JSON scalar.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    pub(crate) fn as_number(&self) -> Result<f64, String> {
        let value = match self {
            Cell::Integer(value) => *value as f64,
            Cell::Float(value) => *value,
            Cell::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("expected a number, found '{text}'"))?,
            Cell::Bool(value) => return Err(format!("expected a number, found '{value}'")),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("expected a finite number, found '{value}'"))
        }
    }

    pub(crate) fn into_text(self) -> String {
        match self {
            Cell::Text(text) => text,
            Cell::Integer(value) => value.to_string(),
            Cell::Float(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = Cell;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a text or numeric cell")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Cell, E> {
        Ok(Cell::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Cell, E> {
        Ok(Cell::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Cell, E> {
        Ok(i64::try_from(value)
            .map(Cell::Integer)
            .unwrap_or(Cell::Float(value as f64)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Cell, E> {
        Ok(Cell::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Cell, E> {
        Ok(Cell::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Cell, E> {
        Ok(Cell::Text(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_parses() {
        assert_eq!(Cell::Text(" 12.5 ".to_string()).as_number(), Ok(12.5));
        assert_eq!(Cell::Integer(3).as_number(), Ok(3.0));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let error = Cell::Text("lots".to_string())
            .as_number()
            .expect_err("text rejected");
        assert_eq!(error, "expected a number, found 'lots'");
        assert!(Cell::Bool(true).as_number().is_err());
        assert!(Cell::Text("NaN".to_string()).as_number().is_err());
        assert!(Cell::Float(f64::INFINITY).as_number().is_err());
    }

    #[test]
    fn deserializes_json_scalars() {
        let cells: Vec<Cell> =
            serde_json::from_str(r#"["a", 4, 4.5, false]"#).expect("cells deserialize");
        assert_eq!(
            cells,
            vec![
                Cell::Text("a".to_string()),
                Cell::Integer(4),
                Cell::Float(4.5),
                Cell::Bool(false),
            ]
        );
    }
}
