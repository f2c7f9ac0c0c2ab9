use serde::Deserialize;
use crate::config::credentials::{CredentialsConfig, TokenConfig};
use crate::config::settings::{CacheConfig, SettingsConfig};


/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub token: TokenConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// ================================
/// Remote spreadsheet
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// key and value columns, e.g. "A:B"
    #[serde(default = "default_columns")]
    pub columns: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SourceConfig {
    pub fn new(spreadsheet_id: &str, base_url: &str) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.to_owned(),
            base_url: base_url.to_owned(),
            columns: default_columns(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_columns() -> String {
    "A:B".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}
