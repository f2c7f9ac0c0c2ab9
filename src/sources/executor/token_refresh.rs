use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::credentials::TokenConfig;
use crate::credentials::credential_store::CredentialStore;
use crate::error::RefreshError;
use crate::helpers::time::{chrono_seconds, now_utc};
use crate::observability::metrics::get_metrics;
use crate::sources::oauth2::OAuthClient;

/// Renewal state of the held token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// remaining lifetime above the threshold
    Idle,
    /// threshold breached, renewal attempted on every tick until it succeeds
    Renewing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Idle { remaining: chrono::Duration },
    Renewed { expiry: DateTime<Utc> },
    /// the store was given a different token (e.g. a fresh login) while the
    /// grant was in flight; that token is kept
    Superseded,
}

/// Background renewal of the OAuth2 access token on a fixed timer.
pub struct TokenRefresher {
    store: Arc<CredentialStore>,
    oauth: OAuthClient,
    refresh_interval: Duration,
    safety_margin: Duration,
    initial_delay: Duration,
    state: RefreshState,
}

impl TokenRefresher {
    pub fn new(store: Arc<CredentialStore>, oauth: OAuthClient, token_config: &TokenConfig) -> Self {
        Self {
            store,
            oauth,
            refresh_interval: Duration::from_secs(token_config.refresh_interval_seconds),
            safety_margin: Duration::from_secs(token_config.safety_margin_seconds),
            initial_delay: Duration::from_secs(token_config.initial_delay_seconds),
            state: RefreshState::Idle,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Minimum remaining lifetime: one full interval plus the safety margin,
    /// so a single missed tick cannot let the token lapse.
    pub fn threshold(&self) -> chrono::Duration {
        chrono_seconds(self.refresh_interval.as_secs().saturating_add(self.safety_margin.as_secs()))
    }

    /// One inspection of the stored token, renewing it when the threshold is breached.
    pub async fn tick(&mut self) -> Result<TickOutcome, RefreshError> {
        let token = self.store.current().await.map_err(|_| RefreshError::NoToken)?;
        let now = now_utc();
        let remaining = token.remaining(now);

        if remaining >= self.threshold() {
            self.state = RefreshState::Idle;
            return Ok(TickOutcome::Idle { remaining });
        }

        self.state = RefreshState::Renewing;
        info!(expiry = %token.expiry, remaining_seconds = remaining.num_seconds(), "renewing access token");
        let metrics = get_metrics().await;
        metrics.token_refresh_attempts.inc();

        let grant = self.oauth.refresh(&token.refresh_token).await?;
        let expiry = grant.expiry_from(now_utc())?;
        let renewed = token.renewed(grant.access_token, expiry, grant.refresh_token);
        if !self.store.replace_if_current(&token, renewed).await? {
            self.state = RefreshState::Idle;
            info!("token replaced while renewing, keeping the newer one");
            return Ok(TickOutcome::Superseded);
        }

        metrics.token_expiry_unix.set(expiry.timestamp());
        self.state = RefreshState::Idle;
        info!(expiry = %expiry, "access token refreshed");
        Ok(TickOutcome::Renewed { expiry })
    }

    /// Tick on a fixed period until `shutdown` flips to true or its sender is dropped.
    /// Failures never stop the loop.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut ticker = interval_at(Instant::now() + self.initial_delay, self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_seconds = self.refresh_interval.as_secs(),
            threshold_seconds = self.threshold().num_seconds(),
            "token refresher started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(TickOutcome::Idle { remaining }) => {
                            debug!(
                                remaining_seconds = remaining.num_seconds(),
                                next_check_seconds = self.refresh_interval.as_secs(),
                                "no need to renew access token"
                            );
                        }
                        Ok(TickOutcome::Renewed { .. }) | Ok(TickOutcome::Superseded) => {}
                        Err(err) => {
                            get_metrics().await
                                .token_refresh_failures
                                .with_label_values(&[err.reason()])
                                .inc();
                            error!(error = %err, "error while renewing token, retrying on next tick");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("token refresher stopped");
                        return Ok(());
                    }
                }
            }
        }
    }
}
