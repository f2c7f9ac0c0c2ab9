use std::time::Duration;

use anyhow::{anyhow, Result};
use http::StatusCode;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::sources::SourceConfig;
use crate::credentials::token::Token;
use crate::error::FetchError;
use crate::sources::fetch::{FetchRows, RawRow};

/// Reads the key/value columns of one sheet of a fixed spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsFetcher {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    columns: String,
}

/// `spreadsheets.values.get` response
#[derive(Debug, Deserialize)]
struct ValueRange {
    // omitted by the api when the range is empty
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsFetcher {
    pub fn new(source_config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(source_config.timeout_ms))
            .build()?;
        let base_url = Url::parse(&source_config.base_url)
            .map_err(|e| anyhow!("invalid source base url '{}': {}", source_config.base_url, e))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: source_config.spreadsheet_id.to_owned(),
            columns: source_config.columns.to_owned(),
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{namespace}!{columns}`, segments percent-encoded
    fn values_url(&self, namespace: &str) -> Result<Url, FetchError> {
        let range = format!("{}!{}", namespace, self.columns);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range.as_str()]);
        Ok(url)
    }
}

impl FetchRows for SheetsFetcher {
    async fn fetch_rows(&self, namespace: &str, token: &Token) -> Result<Vec<RawRow>, FetchError> {
        let url = self.values_url(namespace)?;
        debug!(namespace, url = %url, "fetching sheet");

        let response = self
            .client
            .get(url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Auth(format!("{}: {}", status, body)));
        }
        if !status.is_success() {
            return Err(FetchError::Transport(format!("remote returned {}: {}", status, body)));
        }

        parse_rows(&body)
    }
}

/// Rows with no cells are skipped; every present cell must be a string.
pub fn parse_rows(body: &str) -> Result<Vec<RawRow>, FetchError> {
    let value_range: ValueRange = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    let mut rows = Vec::with_capacity(value_range.values.len());
    for (index, cells) in value_range.values.into_iter().enumerate() {
        let mut cells = cells.into_iter();
        let key = match cells.next() {
            None => continue,
            Some(Value::String(key)) => key,
            Some(other) => {
                return Err(FetchError::MalformedResponse(format!(
                    "row {}: key cell is not a string: {}",
                    index + 1,
                    other
                )))
            }
        };
        let value = match cells.next() {
            None => None,
            Some(Value::String(value)) => Some(value),
            Some(other) => {
                return Err(FetchError::MalformedResponse(format!(
                    "row {}: value cell is not a string: {}",
                    index + 1,
                    other
                )))
            }
        };
        rows.push(RawRow { key, value });
    }
    Ok(rows)
}
