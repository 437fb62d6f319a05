//! Surface-independent request handling.
//!
//! Adapters translate their native request into an [`ApiRequest`], call
//! [`handle`], and translate the resulting [`ApiResponse`] back. Routing,
//! validation, CORS headers and interaction logging all live here.

pub mod question;
pub mod router;

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::interactions::{log_interaction, ClientMeta, Interaction};
use crate::state::AppState;
use router::Route;

pub const ROOT_BANNER: &str = "Resume Bot API - Ready";
pub const NOT_FOUND: &str = "Endpoint not found";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

/// A request normalized from either hosting surface.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
    pub client: ClientMeta,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: body.into(),
            client: ClientMeta::default(),
        }
    }

    pub fn with_client(mut self, client: ClientMeta) -> Self {
        self.client = client;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

/// A response ready to be rendered by either hosting surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self::with_content_type(status, Some(CONTENT_TYPE_JSON), ResponseBody::Json(body))
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::with_content_type(status, Some(CONTENT_TYPE_TEXT), ResponseBody::Text(body.into()))
    }

    /// CORS preflight: headers only.
    pub fn preflight() -> Self {
        Self::with_content_type(200, None, ResponseBody::Empty)
    }

    fn with_content_type(status: u16, content_type: Option<&'static str>, body: ResponseBody) -> Self {
        let mut headers = Vec::with_capacity(4);
        if let Some(content_type) = content_type {
            headers.push(("Content-Type", content_type));
        }
        headers.extend(CORS_HEADERS);
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Serialized body as sent on the wire.
    pub fn body_string(&self) -> String {
        match &self.body {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
            ResponseBody::Empty => String::new(),
        }
    }
}

/// Dispatches one normalized request. Never fails: every outcome is a response.
pub async fn handle(state: &AppState, request: ApiRequest) -> ApiResponse {
    let started = Instant::now();
    let session_id = Uuid::new_v4().to_string();

    info!(
        "Processing {} {} - Session: {}",
        request.method, request.path, session_id
    );

    let (response, error) = match router::resolve(&request.method, &request.path) {
        Route::Question => {
            return question::handle_question(state, &request, &session_id, started).await;
        }
        Route::Health => {
            info!("Health check requested - Session: {session_id}");
            (ApiResponse::json(200, health_body(&state.environment)), None)
        }
        Route::Root => {
            info!("Root endpoint accessed - Session: {session_id}");
            (ApiResponse::text(200, ROOT_BANNER), None)
        }
        Route::Preflight => (ApiResponse::preflight(), None),
        Route::NotFound => {
            warn!(
                "Unknown endpoint - Session: {}, Method: {}, Path: {}",
                session_id, request.method, request.path
            );
            let response = ApiResponse::json(
                404,
                json!({
                    "error": NOT_FOUND,
                    "session_id": &session_id,
                }),
            );
            (response, Some(NOT_FOUND.to_string()))
        }
    };

    // Non-question routes carry no question or answer.
    log_interaction(
        state.interactions.as_ref(),
        &state.environment,
        Interaction {
            session_id: &session_id,
            question: "",
            answer: "",
            response_time_ms: elapsed_ms(started),
            error,
            client: &request.client,
        },
    );

    response
}

pub fn health_body(environment: &str) -> Value {
    json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        "environment": environment,
    })
}

/// Milliseconds elapsed since `started`, saturating.
pub fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
