//! Same-origin forwarding proxy for the Notion pages endpoint.
//!
//! Notion rejects browser-originated calls, so a local server mirrors
//! `POST /v1/pages`: it copies the caller's `Authorization` header and JSON
//! body to the upstream and relays the upstream status and body unchanged.

use crate::types::{NOTION_API_VERSION, PROXY_PAGES_ROUTE};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Shared across requests; holds no mutable state.
#[derive(Clone)]
pub struct ProxyState {
    pub upstream_url: String,
    pub client: reqwest::Client,
}

impl ProxyState {
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(PROXY_PAGES_ROUTE, post(forward_create_page))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn forward_create_page(
    State(state): State<Arc<ProxyState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut request = state
        .client
        .post(&state.upstream_url)
        .header("Notion-Version", NOTION_API_VERSION)
        .json(&body);
    if let Some(authorization) = headers.get(header::AUTHORIZATION) {
        request = request.header(header::AUTHORIZATION, authorization.clone());
    }

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(error) => return proxy_failure(error),
    };

    let status = upstream.status();
    match upstream.bytes().await {
        Ok(bytes) => {
            log::info!("Relayed page creation: upstream answered {}", status.as_u16());
            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes))
                .unwrap_or_else(|_| {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
                })
        }
        Err(error) => proxy_failure(error),
    }
}

fn proxy_failure(error: reqwest::Error) -> Response {
    log::error!("Proxy Error: {error}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Runs the proxy on `127.0.0.1:<port>` until the process is stopped.
pub async fn serve(port: u16, upstream_url: &str) -> Result<(), String> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|error| format!("Cannot bind proxy on {addr}: {error}"))?;

    log::info!("CyberSentinel proxy active on http://localhost:{port}");
    log::info!("Notion gateway: {PROXY_PAGES_ROUTE} -> {upstream_url}");

    axum::serve(listener, router(ProxyState::new(upstream_url)))
        .await
        .map_err(|error| error.to_string())
}
