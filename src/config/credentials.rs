use serde::Deserialize;

pub const SPREADSHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// ================================
/// OAuth2 client + durable token
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    /// OAuth client file ("installed" or "web" section)
    #[serde(default = "default_client_secret_path")]
    pub client_secret_path: String,
    /// token file, rewritten on every renewal
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// overrides the first redirect uri of the client file
    pub redirect_url: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            client_secret_path: default_client_secret_path(),
            token_path: default_token_path(),
            scopes: default_scopes(),
            redirect_url: None,
        }
    }
}

/// ================================
/// Token renewal
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// fixed period of the renewal check
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
    /// renewal starts when remaining lifetime < refresh interval + safety margin
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
    /// delay before the first check
    #[serde(default = "default_initial_delay_seconds")]
    pub initial_delay_seconds: u64,
    /// overrides the token uri of the client file
    pub token_url: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval_seconds(),
            safety_margin_seconds: default_safety_margin_seconds(),
            initial_delay_seconds: default_initial_delay_seconds(),
            token_url: None,
        }
    }
}

fn default_client_secret_path() -> String {
    "credentials.json".to_string()
}

fn default_token_path() -> String {
    "token.json".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![SPREADSHEETS_READONLY_SCOPE.to_string()]
}

fn default_refresh_interval_seconds() -> u64 {
    30 * 60
}

fn default_safety_margin_seconds() -> u64 {
    5 * 60
}

fn default_initial_delay_seconds() -> u64 {
    60
}
