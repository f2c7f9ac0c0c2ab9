use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::sync::watch;
use tracing::info;

use crate::cache::config_cache::ConfigCache;
use crate::config::settings::SettingsConfig;
use crate::credentials::credential_store::CredentialStore;
use crate::endpoints::{auth_routes, config_routes};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::sources::oauth2::OAuthClient;
use crate::sources::sheets::SheetsFetcher;

pub type SheetConfigCache = ConfigCache<SheetsFetcher>;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub config_cache: Arc<SheetConfigCache>,
    pub credential_store: Arc<CredentialStore>,
    pub oauth: Arc<OAuthClient>,
}

impl AppState {
    pub fn new (
        metrics: &Metrics,
        config_cache: Arc<SheetConfigCache>,
        credential_store: Arc<CredentialStore>,
        oauth: Arc<OAuthClient>,
    ) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            config_cache,
            credential_store,
            oauth,
        }
    }
}

/// Service metrics, login flow and sheet routes on one router.
pub fn router(settings_config: &SettingsConfig, state: AppState) -> Router {
    Router::new()
        .merge(state.metrics_state.router(&settings_config.metrics))
        .merge(auth_routes::router())
        .merge(config_routes::router())
        .with_state(state)
}

/// Serve until `shutdown` flips to true.
pub async fn start(
    settings_config: &SettingsConfig,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(settings_config, state);

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(address = %bind_addr, "http server listening");
    metrics.up.set(1);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

    metrics.up.set(0);
    info!("http server stopped");
    Ok(())
}
