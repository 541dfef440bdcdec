//! Google Sheets data source for restock.
//!
//! Reads a single cell (the current re-order list) via the Sheets v4
//! values API, authenticating with a service account: RS256-signed JWT
//! assertion exchanged for a short-lived bearer token, cached until it
//! nears expiry.

pub mod auth;
pub mod client;

pub use auth::ServiceAccountKey;
pub use client::SheetsClient;
