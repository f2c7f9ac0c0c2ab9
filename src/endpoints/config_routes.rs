use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::header::CONTENT_TYPE;
use http::StatusCode;
use tracing::info;

use crate::endpoints::config_metrics::render_prometheus;
use crate::error::{FetchError, QueryError};
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;

static KEY_PARAM: &str = "key";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/{sheet}", get(sheet))
        .route("/{sheet}/", get(sheet))
        .route("/{sheet}/metrics", get(sheet_metrics))
}

/// Data errors are client-class, fetch errors are upstream-class.
pub fn status_for(err: &QueryError) -> StatusCode {
    match err {
        QueryError::KeyNotFound { .. } => StatusCode::NOT_FOUND,
        QueryError::Fetch(FetchError::Credential(_)) => StatusCode::SERVICE_UNAVAILABLE,
        QueryError::Fetch(FetchError::Auth(_))
        | QueryError::Fetch(FetchError::Transport(_))
        | QueryError::Fetch(FetchError::MalformedResponse(_)) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        (status_for(&self), format!("Error: {}", self)).into_response()
    }
}

async fn home() -> Response {
    record("home", StatusCode::OK).await;
    (StatusCode::OK, "It's working!").into_response()
}

/// Full snapshot, or a single value with `?key=`.
async fn sheet(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let response = if query.is_empty() {
        match state.config_cache.get(&sheet).await {
            Ok(snapshot) => Json(&snapshot.values).into_response(),
            Err(err) => QueryError::from(err).into_response(),
        }
    } else if let Some(key) = query.get(KEY_PARAM) {
        match state.config_cache.get_key(&sheet, key).await {
            Ok(value) => Json(value).into_response(),
            Err(err) => err.into_response(),
        }
    } else {
        (StatusCode::BAD_REQUEST, "Error: key param is not in url.").into_response()
    };

    info!(sheet = %sheet, status = %response.status(), "sheet request");
    record("sheet", response.status()).await;
    response
}

async fn sheet_metrics(State(state): State<AppState>, Path(sheet): Path<String>) -> Response {
    let response = match state.config_cache.get(&sheet).await {
        Ok(snapshot) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            render_prometheus(&snapshot),
        )
            .into_response(),
        Err(err) => QueryError::from(err).into_response(),
    };

    record("sheet_metrics", response.status()).await;
    response
}

async fn record(route: &str, status: StatusCode) {
    get_metrics()
        .await
        .http_requests
        .with_label_values(&[route, status.as_str()])
        .inc();
}
