//! Parser for the CSV extracted from a bulk-export archive.
//!
//! The export has no quoting, so rows are split on commas directly. The
//! header line establishes column names for the whole file; two columns are
//! renamed to match the normalized schema.

use serde_json::Value;

use super::{Cell, QuandlError, Row};

/// Ordered column names taken from the export's header line, with
/// `ticker` renamed to `symbol` and `ex-dividend` to `ex_dividend`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMap(Vec<String>);

impl ColumnMap {
    /// Builds the map from the header line.
    pub fn from_header(line: &str) -> Self {
        let columns = line
            .split(',')
            .map(|column| match column.trim_end_matches(['\r', '\n']) {
                "ticker" => "symbol".to_string(),
                "ex-dividend" => "ex_dividend".to_string(),
                other => other.to_string(),
            })
            .collect();
        Self(columns)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Parses the extracted export into ordered row maps, preserving row order.
///
/// Cells in columns whose name contains "volume" are coerced to integers via
/// float-then-truncate; a non-numeric value there is a fatal
/// [`QuandlError::Conversion`]. Every other cell is parsed as `f64` when
/// possible and kept as the original string otherwise.
///
/// A missing header line is unrecoverable for this fetch: it is logged and
/// the whole fetch yields no data rather than partial results.
pub fn parse_export(text: &str) -> Result<Option<Vec<Row>>, QuandlError> {
    let mut lines = text.lines();
    let columns = match lines.next() {
        Some(header) if !header.trim().is_empty() => ColumnMap::from_header(header),
        _ => {
            tracing::error!("bulk export CSV is missing its header line");
            return Ok(None);
        }
    };

    let mut rows = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut row = Row::new();
        for (name, raw) in columns.names().iter().zip(line.split(',')) {
            let raw = raw.trim_end_matches('\r');
            let value = if name.contains("volume") {
                let n = raw
                    .parse::<f64>()
                    .map_err(|_| QuandlError::Conversion(raw.to_string()))?;
                Value::from(n as i64)
            } else {
                match Cell::parse(raw) {
                    Cell::Number(n) => Value::from(n),
                    Cell::Text(text) => Value::from(text),
                }
            };
            row.insert(name.clone(), value);
        }
        rows.push(row);
    }
    Ok(Some(rows))
}
