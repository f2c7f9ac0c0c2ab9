use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// OAuth2 token as persisted in the token file.
///
/// `expiry` is the only source of truth for validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    // absent expiry deserializes to the epoch and is renewed on the first tick
    #[serde(default)]
    pub expiry: DateTime<Utc>,
}

impl Token {
    pub fn new(access_token: String, refresh_token: String, expiry: DateTime<Utc>) -> Self {
        Self {
            access_token,
            token_type: default_token_type(),
            refresh_token,
            expiry,
        }
    }

    /// Remaining lifetime relative to `now`, negative once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expiry - now
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }

    /// Token produced by a refresh grant: new access token and expiry,
    /// refresh token kept unless the provider rotated it.
    pub fn renewed(
        &self,
        access_token: String,
        expiry: DateTime<Utc>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token,
            token_type: self.token_type.to_owned(),
            refresh_token: refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| self.refresh_token.to_owned()),
            expiry,
        }
    }
}

fn default_token_type() -> String {
    TOKEN_TYPE_BEARER.to_string()
}
