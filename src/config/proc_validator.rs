//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates invariants of the renewal loop, cache, remote source and server

use reqwest::Url;
use tracing::info;

use crate::config::credentials::{CredentialsConfig, TokenConfig};
use crate::config::settings::{CacheConfig, SettingsConfig};
use crate::config::sources::{ServiceConfig, SourceConfig};

/// Upper bound for every renewal timing. Provider access tokens live about an hour.
pub const MAX_TOKEN_TIMING_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);
    validate_token(&cfg.token, &mut errors);
    validate_source(&cfg.source, &mut errors);
    validate_cache(&cfg.cache, &mut errors);

    if errors.is_empty() {
        info!("config validated");
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }
    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
    if let Some(logging) = &settings.logging {
        let allowed = ["trace", "debug", "info", "warn", "error"];
        if !allowed.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, allowed
            ));
        }
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    if credentials.client_secret_path.trim().is_empty() {
        errors.push("credentials.client_secret_path must not be empty".to_string());
    }
    if credentials.token_path.trim().is_empty() {
        errors.push("credentials.token_path must not be empty".to_string());
    }
    if credentials.scopes.is_empty() {
        errors.push("credentials.scopes must contain at least one scope".to_string());
    }
    if let Some(redirect_url) = &credentials.redirect_url {
        if Url::parse(redirect_url).is_err() {
            errors.push(format!("credentials.redirect_url '{}' is not a valid url", redirect_url));
        }
    }
}

fn validate_token(token: &TokenConfig, errors: &mut Vec<String>) {
    if token.refresh_interval_seconds == 0 {
        errors.push("token.refresh_interval_seconds must be > 0".to_string());
    }
    // the renewal threshold is interval + margin, so a zero margin lets a
    // single late tick expire the token
    if token.safety_margin_seconds == 0 {
        errors.push("token.safety_margin_seconds must be > 0".to_string());
    }
    for (name, seconds) in [
        ("refresh_interval_seconds", token.refresh_interval_seconds),
        ("safety_margin_seconds", token.safety_margin_seconds),
        ("initial_delay_seconds", token.initial_delay_seconds),
    ] {
        if seconds > MAX_TOKEN_TIMING_SECONDS {
            errors.push(format!(
                "token.{} must be <= {}, got {}",
                name, MAX_TOKEN_TIMING_SECONDS, seconds
            ));
        }
    }
    if let Some(token_url) = &token.token_url {
        if Url::parse(token_url).is_err() {
            errors.push(format!("token.token_url '{}' is not a valid url", token_url));
        }
    }
}

fn validate_source(source: &SourceConfig, errors: &mut Vec<String>) {
    if source.spreadsheet_id.trim().is_empty() {
        errors.push("source.spreadsheet_id must not be empty".to_string());
    }
    if Url::parse(&source.base_url).is_err() {
        errors.push(format!("source.base_url '{}' is not a valid url", source.base_url));
    }
    if !source.columns.contains(':') {
        errors.push(format!(
            "source.columns '{}' must be a column range like 'A:B'",
            source.columns
        ));
    }
    if source.timeout_ms == 0 {
        errors.push("source.timeout_ms must be > 0".to_string());
    }
}

fn validate_cache(cache: &CacheConfig, errors: &mut Vec<String>) {
    if cache.enabled && cache.ttl_seconds == 0 {
        errors.push("cache.ttl_seconds must be > 0 when cache.enabled is true".to_string());
    }
}
