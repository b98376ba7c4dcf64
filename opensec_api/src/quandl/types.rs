//! Record types shared by the datatable lookups and the bulk-export parser.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::QuandlError;

/// An ordered row from the bulk-export CSV, keyed by [`super::ColumnMap`]
/// names.
pub type Row = serde_json::Map<String, Value>;

/// A best-effort numeric value: a parsed number, or the original text when
/// the source field is a non-numeric placeholder (or simply a string such as
/// the symbol or date columns).
///
/// Serialized untagged, so the JSON output is a bare number or string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Parses raw text as `f64`, keeping the original string on failure.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

/// One end-of-day price record in the normalized schema.
///
/// The two volume fields are always integers; everything else is passed
/// through from the source as-is.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: Cell,
    pub date: Cell,
    pub open: Cell,
    pub high: Cell,
    pub low: Cell,
    pub close: Cell,
    pub volume: i64,
    pub ex_dividend: Cell,
    pub split_ratio: Cell,
    pub adj_open: Cell,
    pub adj_high: Cell,
    pub adj_low: Cell,
    pub adj_close: Cell,
    pub adj_volume: i64,
}

impl PriceRecord {
    /// Builds a record from the API's positional 14-field datatable row.
    pub fn from_row(row: &[Value]) -> Result<Self, QuandlError> {
        if row.len() != 14 {
            return Err(QuandlError::MalformedRow(row.len()));
        }
        Ok(Self {
            symbol: Cell::from_value(&row[0]),
            date: Cell::from_value(&row[1]),
            open: Cell::from_value(&row[2]),
            high: Cell::from_value(&row[3]),
            low: Cell::from_value(&row[4]),
            close: Cell::from_value(&row[5]),
            volume: coerce_volume(&row[6])?,
            ex_dividend: Cell::from_value(&row[7]),
            split_ratio: Cell::from_value(&row[8]),
            adj_open: Cell::from_value(&row[9]),
            adj_high: Cell::from_value(&row[10]),
            adj_low: Cell::from_value(&row[11]),
            adj_close: Cell::from_value(&row[12]),
            adj_volume: coerce_volume(&row[13])?,
        })
    }
}

/// Result shape for ranged fetches: a lone record stays a bare object on the
/// wire, two or more become an array. "No data" is `None` at the call site.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceSeries {
    One(PriceRecord),
    Many(Vec<PriceRecord>),
}

/// Integer coercion via the float-then-truncate path, so `"1234.0"`-style
/// inputs are accepted.
pub(crate) fn coerce_volume(value: &Value) -> Result<i64, QuandlError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .map(|f| f as i64)
        .ok_or_else(|| QuandlError::Conversion(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Vec<Value> {
        json!([
            "AAPL",
            "2017-03-27",
            139.39,
            141.22,
            138.62,
            140.88,
            "23575094.0",
            0.0,
            1.0,
            137.09,
            138.89,
            136.33,
            138.55,
            23575094
        ])
        .as_array()
        .unwrap()
        .clone()
    }

    #[test]
    fn from_row_names_all_fourteen_fields() {
        let record = PriceRecord::from_row(&sample_row()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 14);
        for key in [
            "symbol",
            "date",
            "open",
            "high",
            "low",
            "close",
            "volume",
            "ex_dividend",
            "split_ratio",
            "adj_open",
            "adj_high",
            "adj_low",
            "adj_close",
            "adj_volume",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn from_row_coerces_volume_fields_to_integers() {
        let record = PriceRecord::from_row(&sample_row()).unwrap();
        assert_eq!(record.volume, 23_575_094);
        assert_eq!(record.adj_volume, 23_575_094);
        assert_eq!(record.open, Cell::Number(139.39));
        assert_eq!(record.symbol, Cell::Text("AAPL".to_string()));
    }

    #[test]
    fn from_row_rejects_wrong_arity() {
        let short = vec![Value::from("AAPL"), Value::from("2017-03-27")];
        assert!(matches!(
            PriceRecord::from_row(&short),
            Err(QuandlError::MalformedRow(2))
        ));
    }

    #[test]
    fn from_row_rejects_non_numeric_volume() {
        let mut row = sample_row();
        row[6] = Value::from("N/A");
        assert!(matches!(
            PriceRecord::from_row(&row),
            Err(QuandlError::Conversion(_))
        ));
    }

    #[test]
    fn cell_parse_falls_back_to_text() {
        assert_eq!(Cell::parse("140.88"), Cell::Number(140.88));
        assert_eq!(Cell::parse("N/A"), Cell::Text("N/A".to_string()));
    }

    #[test]
    fn series_serializes_one_as_object_and_many_as_array() {
        let record = PriceRecord::from_row(&sample_row()).unwrap();
        let one = serde_json::to_value(PriceSeries::One(record.clone())).unwrap();
        assert!(one.is_object());

        let many = serde_json::to_value(PriceSeries::Many(vec![record.clone(), record])).unwrap();
        assert!(many.is_array());
        assert_eq!(many.as_array().unwrap().len(), 2);
    }
}
