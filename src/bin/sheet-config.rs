use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use sheet_config::cache::config_cache::{CachePolicy, ConfigCache};
use sheet_config::credentials::client_secret::ClientCredentials;
use sheet_config::credentials::credential_store::CredentialStore;
use sheet_config::observability::metrics::get_metrics;
use sheet_config::server;
use sheet_config::server::server::AppState;
use sheet_config::sources::executor::token_refresh::TokenRefresher;
use sheet_config::sources::oauth2::OAuthClient;
use sheet_config::sources::sheets::SheetsFetcher;
use sheet_config::utils::logging::LogLevel;
use sheet_config::utils::{config_loader, logging, shutdown};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "sheet-config.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);
    let (shutdown_tx, shutdown_rx) = shutdown::channel();

    // -------------------------------
    // 2. Credentials: durable token + OAuth client
    // -------------------------------

    let credential_store = Arc::new(CredentialStore::open(&service_config.credentials.token_path).await?);
    let client_credentials = ClientCredentials::from_file(Path::new(&service_config.credentials.client_secret_path))?;
    let oauth = OAuthClient::new(
        client_credentials,
        &service_config.credentials,
        &service_config.token,
        Duration::from_millis(service_config.source.timeout_ms),
    )?;

    if let Ok(token) = credential_store.current().await {
        get_metrics().await.token_expiry_unix.set(token.expiry.timestamp());
    }

    // -------------------------------
    // 3. Token renewal loop
    // -------------------------------

    let refresher = TokenRefresher::new(credential_store.clone(), oauth.clone(), &service_config.token);
    let refresher = refresher.run(shutdown_rx.clone());

    // -------------------------------
    // 4. Config cache over the spreadsheet
    // -------------------------------

    let fetcher = SheetsFetcher::new(&service_config.source)?;
    let config_cache = Arc::new(ConfigCache::new(
        credential_store.clone(),
        fetcher,
        CachePolicy::from(&service_config.cache),
    ));
    let policy = config_cache.policy();
    info!(enabled = policy.enabled, ttl_seconds = policy.ttl.as_secs(), "config cache ready");

    // -------------------------------
    // 5. Http server
    // -------------------------------

    let state = AppState::new(get_metrics().await, config_cache, credential_store, Arc::new(oauth));
    let http_server = server::server::start(&service_config.settings, state, shutdown_rx);
    let signals = shutdown::wait_for_signal(shutdown_tx);

    info!("Service starting...");
    tokio::try_join!(refresher, http_server, signals)?;

    Ok(())
}
