//! TOML configuration, loaded from `~/.restock/config.toml`.
//!
//! Secrets can also arrive via the environment (`CHANNEL_ACCESS_TOKEN`,
//! `CHANNEL_SECRET`, `LINE_GROUP_IDS`); environment values override the
//! file so the bot can run in containers without a config on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RestockError, Result};

/// LINE Messaging API settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineConfig {
    /// Channel access token for the Messaging API.
    #[serde(default)]
    pub channel_access_token: String,
    /// Channel secret, used to verify webhook signatures.
    #[serde(default)]
    pub channel_secret: String,
    /// Group ids the weekly broadcast goes to.
    #[serde(default)]
    pub group_ids: Vec<String>,
}

/// Google Sheets data-source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_sheet_range")]
    pub range: String,
    /// Service-account credentials: inline JSON or a path to a JSON file.
    #[serde(default)]
    pub credentials: String,
}

fn default_sheet_name() -> String {
    "Last Entry".into()
}

fn default_sheet_range() -> String {
    "B12".into()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            range: default_sheet_range(),
            credentials: String::new(),
        }
    }
}

/// Recurring-broadcast schedule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Start the recurring job as soon as the server boots.
    #[serde(default)]
    pub auto_start: bool,
    /// Days between broadcasts.
    #[serde(default = "default_period_days")]
    pub period_days: u64,
}

fn default_period_days() -> u64 {
    7
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { auto_start: false, period_days: default_period_days() }
    }
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RestockConfig {
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl RestockConfig {
    /// `~/.restock`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".restock")
    }

    /// `~/.restock/config.toml`
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path, falling back to defaults when the file
    /// does not exist yet. Environment overrides are applied either way.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::read_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RestockError::ConfigNotFound(path.display().to_string()));
        }
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| RestockError::Config(format!("{}: {e}", path.display())))
    }

    /// Write to the default path, creating `~/.restock` if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| RestockError::Config(format!("serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("CHANNEL_ACCESS_TOKEN") {
            if !token.is_empty() {
                self.line.channel_access_token = token;
            }
        }
        if let Ok(secret) = std::env::var("CHANNEL_SECRET") {
            if !secret.is_empty() {
                self.line.channel_secret = secret;
            }
        }
        if let Ok(ids) = std::env::var("LINE_GROUP_IDS") {
            if !ids.is_empty() {
                self.line.group_ids = ids
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
    }

    /// Broadcast period as a duration.
    pub fn broadcast_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.schedule.period_days * 24 * 60 * 60)
    }

    /// Expand `~` and env vars in a user-supplied path.
    pub fn expand_path(raw: &str) -> String {
        shellexpand::full(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string())
    }
}
