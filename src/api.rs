//! HTTP passthrough for the quiz feed.
//!
//! The browser only talks to this origin; this endpoint forwards the request to
//! the upstream feed and relays the JSON it gets back.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::feed::{FeedError, FeedResult};
use crate::state::AppState;

/// Relay the upstream quiz document.
///
/// GET /api/proxy
///
/// Answers 500 with `{"error": "Failed to fetch data"}` when the upstream is
/// unreachable, returns a non-success status, or does not return JSON.
pub async fn proxy_feed(State(state): State<Arc<AppState>>) -> Response {
    match fetch_upstream(&state.http, &state.config.upstream_url).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!("Proxy API error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch data" })),
            )
                .into_response()
        }
    }
}

/// Single GET against the upstream, no retry. The body is checked to be JSON
/// and returned byte for byte.
async fn fetch_upstream(client: &reqwest::Client, url: &str) -> FeedResult<Bytes> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FeedError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FeedError::Status(response.status().as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FeedError::Request(e.to_string()))?;

    serde_json::from_slice::<serde::de::IgnoredAny>(&body)
        .map_err(|e| FeedError::Parse(e.to_string()))?;

    Ok(body)
}
