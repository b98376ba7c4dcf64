//! Client for the Quandl WIKI/PRICES datatable: single-day and ranged
//! lookups plus the bulk-export download flow.

mod client;
mod csv;
mod error;
mod types;

pub use self::client::PriceClient;
pub use self::csv::{parse_export, ColumnMap};
pub use self::error::QuandlError;
pub use self::types::{Cell, PriceRecord, PriceSeries, Row};
