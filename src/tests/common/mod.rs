// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;

use crate::config::credentials::{CredentialsConfig, TokenConfig};
use crate::credentials::client_secret::ClientCredentials;
use crate::credentials::credential_store::CredentialStore;
use crate::credentials::token::Token;
use crate::error::FetchError;
use crate::sources::fetch::{FetchRows, RawRow};
use crate::sources::oauth2::OAuthClient;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

/// Token with a refresh token, expiring `seconds` from now (negative for already expired).
pub fn token_expiring_in(access_token: &str, seconds: i64) -> Token {
    Token::new(
        access_token.to_owned(),
        "refresh-1".to_owned(),
        Utc::now() + chrono::Duration::seconds(seconds),
    )
}

/// Store at `<dir>/token.json`, optionally seeded with `token`.
pub async fn store_with_token(dir: &Path, token: Option<Token>) -> Arc<CredentialStore> {
    let store = CredentialStore::open(dir.join("token.json")).await.expect("open store");
    if let Some(token) = token {
        store.replace(token).await.expect("seed token");
    }
    Arc::new(store)
}

pub fn client_credentials(base_url: &str) -> ClientCredentials {
    ClientCredentials {
        client_id: "client-id".to_owned(),
        client_secret: "client-secret".to_owned(),
        auth_uri: format!("{}/o/oauth2/auth", base_url),
        token_uri: format!("{}/token", base_url),
        redirect_uris: vec!["http://localhost:4040/callback".to_owned()],
    }
}

/// OAuth client whose token endpoint is `<base_url>/token`.
pub fn oauth_client(base_url: &str) -> OAuthClient {
    OAuthClient::new(
        client_credentials(base_url),
        &CredentialsConfig::default(),
        &TokenConfig::default(),
        Duration::from_secs(5),
    )
    .expect("oauth client")
}

/// `spreadsheets.values.get` body with the given rows.
pub fn values_body(sheet: &str, rows: &[&[&str]]) -> serde_json::Value {
    json!({
        "range": format!("{}!A1:B{}", sheet, rows.len()),
        "majorDimension": "ROWS",
        "values": rows,
    })
}

/// In-memory source answering from a queue of scripted results.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    calls: Arc<AtomicUsize>,
    responses: Arc<Mutex<VecDeque<Result<Vec<RawRow>, FetchError>>>>,
}

impl ScriptedFetcher {
    pub fn push_rows(&self, rows: &[(&str, Option<&str>)]) {
        let rows = rows.iter().map(|(key, value)| RawRow::new(*key, *value)).collect();
        self.responses.lock().unwrap().push_back(Ok(rows));
    }

    pub fn push_err(&self, err: FetchError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FetchRows for ScriptedFetcher {
    async fn fetch_rows(&self, _namespace: &str, _token: &Token) -> Result<Vec<RawRow>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".to_owned())))
    }
}
