use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use tracing::{error, info};

use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;

pub static OAUTH_STATE: &str = "state-token";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
}

/// Redirect the browser to the provider consent page.
async fn login(State(state): State<AppState>) -> Response {
    match state.oauth.authorization_url(OAUTH_STATE) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(err) => {
            error!("unable to build authorization url: {}", err);
            (StatusCode::BAD_REQUEST, format!("Unable to build authorization url: {}", err)).into_response()
        }
    }
}

/// Exchange the authorization code and store the first token.
async fn callback(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(code) = query.get("code") else {
        return (StatusCode::BAD_REQUEST, "Unable to read authorization code").into_response();
    };
    if query.get("state").map(String::as_str) != Some(OAUTH_STATE) {
        return (StatusCode::BAD_REQUEST, "Unexpected oauth state").into_response();
    }

    let token = match state.oauth.exchange_code(code).await {
        Ok(token) => token,
        Err(err) => {
            error!("unable to retrieve token from web: {}", err);
            return (StatusCode::BAD_REQUEST, format!("Unable to retrieve token from web: {}", err)).into_response();
        }
    };

    let expiry = token.expiry;
    match state.credential_store.replace(token).await {
        Ok(()) => {
            get_metrics().await.token_expiry_unix.set(expiry.timestamp());
            info!(expiry = %expiry, "logged in");
            (StatusCode::OK, "You are logged in!").into_response()
        }
        Err(err) => {
            error!("unable to save oauth token: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Unable to save oauth token: {}", err)).into_response()
        }
    }
}
