//! Provider clients for opensecurities: end-of-day prices, quotes, company
//! lookups against the regulatory filings feed, and exchange symbol listings.
//!
//! Every client takes a base-URL override so it can be pointed at a wiremock
//! server in tests.

pub mod edgar;
pub mod markit;
pub mod nasdaq;
pub mod quandl;
