//! Sheets values API client.

use async_trait::async_trait;
use restock_core::config::SheetsConfig;
use restock_core::{InventorySource, Result, RestockError};

use crate::auth::{ServiceAccountAuth, ServiceAccountKey};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Reads the configured inventory cell from a spreadsheet.
pub struct SheetsClient {
    config: SheetsConfig,
    auth: ServiceAccountAuth,
    client: reqwest::Client,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        if config.spreadsheet_id.is_empty() {
            return Err(RestockError::config("sheets.spreadsheet_id is not set"));
        }
        let key = ServiceAccountKey::from_config_value(&config.credentials)?;
        Ok(Self { config, auth: ServiceAccountAuth::new(key), client: reqwest::Client::new() })
    }

    fn values_url(&self) -> String {
        let range = format!("{}!{}", self.config.sheet_name, self.config.range);
        format!("{SHEETS_API}/{}/values/{}", self.config.spreadsheet_id, urlencoding::encode(&range))
    }
}

#[async_trait]
impl InventorySource for SheetsClient {
    async fn fetch(&self) -> Result<String> {
        let bearer = self.auth.bearer().await?;

        let response = self
            .client
            .get(self.values_url())
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| RestockError::Fetch(format!("sheets request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RestockError::Fetch(format!("sheets {status}: {text}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RestockError::Fetch(format!("invalid sheets response: {e}")))?;

        let value = extract_cell(&body)?;
        tracing::debug!(range = %self.values_url(), "fetched inventory cell");
        Ok(value)
    }
}

/// Pull `values[0][0]` out of a values.get response.
fn extract_cell(body: &serde_json::Value) -> Result<String> {
    body["values"]
        .get(0)
        .and_then(|row| row.get(0))
        .and_then(|cell| cell.as_str())
        .map(String::from)
        .ok_or_else(|| RestockError::fetch("inventory cell is empty or missing"))
}
