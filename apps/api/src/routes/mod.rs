//! HTTP server surface: axum in, [`ApiResponse`] out.
//!
//! Routing is shared with the function surface, so axum only sees a fallback
//! that hands every request to [`api::handle`].

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tracing::info;

use crate::api::{self, ApiRequest, ApiResponse};
use crate::interactions::ClientMeta;
use crate::state::AppState;

/// Body size is not capped here: both surfaces must answer every request
/// through [`api::handle`], so axum's default 2 MB limit is lifted.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_http)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn handle_http(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Response {
    let client = client_meta(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    info!(
        "Request: {} {} - IP: {}",
        method,
        uri,
        client.ip_address.as_deref().unwrap_or("-")
    );

    let request = ApiRequest::new(method.as_str(), uri.path(), body.to_vec()).with_client(client);
    let response = api::handle(&state, request).await;

    info!("Response: {} - {} {}", response.status, method, uri);
    response.into_response()
}

/// Client metadata from request headers, preferring the first `X-Forwarded-For`
/// hop over the socket peer when running behind a proxy.
fn client_meta(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientMeta {
    let header_str = |name: &HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    ClientMeta {
        user_agent: header_str(&header::USER_AGENT),
        ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut headers = HeaderMap::new();
        for &(name, value) in &self.headers {
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                headers.insert(name, HeaderValue::from_static(value));
            }
        }

        (status, headers, Body::from(self.body_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_meta_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();

        let meta = client_meta(&headers, Some(peer));
        assert_eq!(meta.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(meta.ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_meta_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.10:443".parse().unwrap();
        let meta = client_meta(&HeaderMap::new(), Some(peer));
        assert_eq!(meta.user_agent, None);
        assert_eq!(meta.ip_address.as_deref(), Some("192.0.2.10"));
    }

    #[test]
    fn test_api_response_renders_headers() {
        let response = ApiResponse::text(200, "ok").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
