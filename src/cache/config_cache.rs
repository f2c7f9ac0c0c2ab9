use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::snapshot::ConfigSnapshot;
use crate::config::settings::CacheConfig;
use crate::credentials::credential_store::CredentialStore;
use crate::error::{FetchError, QueryError};
use crate::helpers::time::{get_instant, now_utc};
use crate::observability::metrics::get_metrics;
use crate::parser::coerce::ConfigValue;
use crate::sources::fetch::FetchRows;

static OK_MSG: &str = "ok";
static ERROR_MSG: &str = "error";

/// Freshness rule applied to every namespace.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// when false every `get` refetches
    pub enabled: bool,
    pub ttl: Duration,
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            ttl: Duration::from_secs(config.ttl_seconds),
        }
    }
}

/// Replaced wholesale on every successful refresh, never evicted.
#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: Arc<ConfigSnapshot>,
    fetched_at: Instant,
}

/// Per-namespace snapshots with TTL freshness and stale-serve on failure.
///
/// The map lock is held only for lookups and for the final swap; the
/// remote fetch runs outside of it. Two concurrent stale reads of the same
/// namespace may both fetch, the last one to finish wins.
pub struct ConfigCache<F> {
    store: Arc<CredentialStore>,
    fetcher: F,
    policy: CachePolicy,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<F: FetchRows + Sync> ConfigCache<F> {
    pub fn new(store: Arc<CredentialStore>, fetcher: F, policy: CachePolicy) -> Self {
        Self {
            store,
            fetcher,
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Snapshot of `namespace`, served from cache while fresh.
    ///
    /// A failed refresh falls back to the last good snapshot; the error
    /// surfaces only when the namespace was never fetched successfully.
    pub async fn get(&self, namespace: &str) -> Result<Arc<ConfigSnapshot>, FetchError> {
        let metrics = get_metrics().await;

        if let Some(entry) = self.entry(namespace).await {
            if !self.is_stale(&entry) {
                metrics.cache_hits.inc();
                return Ok(entry.snapshot);
            }
        }

        metrics.cache_refetches.inc();
        match self.refresh(namespace).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => match self.entry(namespace).await {
                Some(entry) => {
                    metrics.cache_stale_served.inc();
                    warn!(namespace, error = %err, fetched_at = %entry.snapshot.fetched_at, "refresh failed, serving stale snapshot");
                    Ok(entry.snapshot)
                }
                None => {
                    warn!(namespace, error = %err, "refresh failed, no snapshot to fall back to");
                    Err(err)
                }
            },
        }
    }

    /// Single value lookup on top of [`ConfigCache::get`].
    pub async fn get_key(&self, namespace: &str, key: &str) -> Result<ConfigValue, QueryError> {
        let snapshot = self.get(namespace).await?;
        snapshot
            .get(key)
            .cloned()
            .ok_or_else(|| QueryError::KeyNotFound {
                namespace: namespace.to_owned(),
                key: key.to_owned(),
            })
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        !self.policy.enabled || get_instant().duration_since(entry.fetched_at) >= self.policy.ttl
    }

    async fn entry(&self, namespace: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(namespace).cloned()
    }

    async fn refresh(&self, namespace: &str) -> Result<Arc<ConfigSnapshot>, FetchError> {
        let metrics = get_metrics().await;
        let start = get_instant();

        let result = self.fetch_snapshot(namespace).await;
        let outcome = if result.is_ok() { OK_MSG } else { ERROR_MSG };
        metrics
            .fetch_duration
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        let snapshot = Arc::new(result.inspect_err(|err| {
            metrics.fetch_failures.with_label_values(&[err.reason()]).inc();
        })?);

        let entry = CacheEntry {
            snapshot: snapshot.clone(),
            fetched_at: get_instant(),
        };
        self.entries.write().await.insert(namespace.to_owned(), entry);
        info!(namespace, keys = snapshot.len(), "snapshot installed");
        Ok(snapshot)
    }

    async fn fetch_snapshot(&self, namespace: &str) -> Result<ConfigSnapshot, FetchError> {
        let token = self.store.current().await?;
        if token.is_expired_at(now_utc()) {
            return Err(FetchError::Credential(format!(
                "access token expired at {}, waiting for renewal",
                token.expiry
            )));
        }

        debug!(namespace, "fetching rows");
        let rows = self.fetcher.fetch_rows(namespace, &token).await?;
        Ok(ConfigSnapshot::from_rows(rows, now_utc()))
    }
}
