use std::future::Future;

use crate::credentials::token::Token;
use crate::error::FetchError;

/// One (key, value) row of the remote table, in stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub key: String,
    /// absent when the row has no second cell
    pub value: Option<String>,
}

impl RawRow {
    pub fn new(key: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_owned),
        }
    }
}

/// Remote tabular source. One authenticated call per invocation, no retries.
pub trait FetchRows {
    fn fetch_rows(
        &self,
        namespace: &str,
        token: &Token,
    ) -> impl Future<Output = Result<Vec<RawRow>, FetchError>> + Send;
}
