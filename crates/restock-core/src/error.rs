//! Unified error types for restock.

use thiserror::Error;

/// Result type alias using RestockError.
pub type Result<T> = std::result::Result<T, RestockError>;

#[derive(Error, Debug)]
pub enum RestockError {
    // Configuration errors — surfaced to the caller, never retried
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // Data source errors — the scheduled job retries at its next period
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    // Delivery errors — captured per target / per event in reports
    #[error("Delivery error: {0}")]
    Delivery(String),

    // Channel errors — transport-level problems (bad payloads, signatures)
    #[error("Channel error: {0}")]
    Channel(String),

    // Gateway errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Other(String),
}

impl RestockError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }
}
