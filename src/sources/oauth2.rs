use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::credentials::{CredentialsConfig, TokenConfig};
use crate::credentials::client_secret::ClientCredentials;
use crate::credentials::token::Token;
use crate::error::RefreshError;

const GRANT_REFRESH_TOKEN: &str = "refresh_token";
const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";

/// Token endpoint response for both the refresh and the code grant.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl GrantResponse {
    /// Absolute expiry of the granted token. A lifetime that is not
    /// positive or does not fit a timestamp is a malformed response.
    pub fn expiry_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, RefreshError> {
        if self.expires_in <= 0 {
            return Err(RefreshError::MalformedResponse(format!(
                "expires_in must be positive, got {}",
                self.expires_in
            )));
        }
        chrono::Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                RefreshError::MalformedResponse(format!("expires_in {} is out of range", self.expires_in))
            })
    }
}

/// Client of the identity provider token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: ClientCredentials,
    token_url: String,
    redirect_url: Option<String>,
    scopes: Vec<String>,
    client: Client,
}

impl OAuthClient {
    pub fn new(
        credentials: ClientCredentials,
        credentials_config: &CredentialsConfig,
        token_config: &TokenConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let token_url = token_config
            .token_url
            .to_owned()
            .unwrap_or_else(|| credentials.token_uri.to_owned());
        let redirect_url = credentials_config
            .redirect_url
            .to_owned()
            .or_else(|| credentials.redirect_uris.first().cloned());

        Ok(Self {
            credentials,
            token_url,
            redirect_url,
            scopes: credentials_config.scopes.to_owned(),
            client,
        })
    }

    /// Consent page url asking for offline access, so a refresh token is issued.
    pub fn authorization_url(&self, state: &str) -> Result<Url> {
        let redirect_url = self
            .redirect_url
            .as_deref()
            .ok_or_else(|| anyhow!("no redirect url configured for the OAuth client"))?;
        let scope = self.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.credentials.auth_uri,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", redirect_url),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("approval_prompt", "force"),
                ("state", state),
            ],
        )?;
        Ok(url)
    }

    /// Authorization-code grant, used once after the user consented.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, RefreshError> {
        let redirect_url = self.redirect_url.as_deref().unwrap_or_default();
        let grant = self
            .post_grant(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("grant_type", GRANT_AUTHORIZATION_CODE),
                ("redirect_uri", redirect_url),
            ])
            .await?;

        let expiry = grant.expiry_from(Utc::now())?;
        let refresh_token = grant
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(RefreshError::MissingRefreshToken)?;
        info!("authorization code exchanged");
        Ok(Token::new(grant.access_token, refresh_token, expiry))
    }

    /// Refresh grant.
    pub async fn refresh(&self, refresh_token: &str) -> Result<GrantResponse, RefreshError> {
        if refresh_token.is_empty() {
            return Err(RefreshError::MissingRefreshToken);
        }
        self.post_grant(&[
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", GRANT_REFRESH_TOKEN),
        ])
        .await
    }

    async fn post_grant(&self, form: &[(&str, &str)]) -> Result<GrantResponse, RefreshError> {
        debug!(url = %self.token_url, "token endpoint request");
        let response = self
            .client
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RefreshError::InvalidGrant { status: status.as_u16(), body });
        }
        serde_json::from_str(&body).map_err(|e| RefreshError::MalformedResponse(e.to_string()))
    }
}
