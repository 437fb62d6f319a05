//! Serverless surface: a raw invocation event in, a proxy-style response out.
//!
//! Accepts API Gateway REST (v1) events, API Gateway HTTP (v2) events and
//! direct invocations, and normalizes all three into an [`ApiRequest`].

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{self, ApiRequest, ApiResponse};
use crate::interactions::ClientMeta;
use crate::state::AppState;

/// Response envelope understood by API Gateway and function URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<ApiResponse> for FunctionResponse {
    fn from(response: ApiResponse) -> Self {
        FunctionResponse {
            status_code: response.status,
            headers: response
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: response.body_string(),
        }
    }
}

/// Handles one invocation event end to end.
pub async fn handle_event(state: &AppState, event: Value) -> FunctionResponse {
    debug!("Invocation event: {event}");
    let request = normalize_event(&event);
    api::handle(state, request).await.into()
}

/// Which trigger produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RestApi,
    HttpApi,
    Direct,
}

pub fn event_kind(event: &Value) -> EventKind {
    if event.get("httpMethod").is_some() {
        EventKind::RestApi
    } else if event.pointer("/requestContext/http").is_some() {
        EventKind::HttpApi
    } else {
        EventKind::Direct
    }
}

/// Extracts method, path, body and client metadata from any supported event.
pub fn normalize_event(event: &Value) -> ApiRequest {
    match event_kind(event) {
        EventKind::RestApi => ApiRequest::new(
            str_at(event, "/httpMethod").unwrap_or("GET"),
            str_at(event, "/path").unwrap_or("/"),
            event_body(event),
        )
        .with_client(ClientMeta {
            user_agent: header(event, "user-agent")
                .or_else(|| str_at(event, "/requestContext/identity/userAgent").map(str::to_string)),
            ip_address: str_at(event, "/requestContext/identity/sourceIp").map(str::to_string),
        }),
        EventKind::HttpApi => ApiRequest::new(
            str_at(event, "/requestContext/http/method").unwrap_or("GET"),
            str_at(event, "/requestContext/http/path").unwrap_or("/"),
            event_body(event),
        )
        .with_client(ClientMeta {
            user_agent: str_at(event, "/requestContext/http/userAgent")
                .map(str::to_string)
                .or_else(|| header(event, "user-agent")),
            ip_address: str_at(event, "/requestContext/http/sourceIp").map(str::to_string),
        }),
        EventKind::Direct => {
            let body = match event {
                Value::String(s) => s.clone().into_bytes(),
                other => other.to_string().into_bytes(),
            };
            ApiRequest::new("POST", "/question", body)
        }
    }
}

/// Raw request body of a proxy event. Absent and null bodies are empty;
/// non-string bodies are re-serialized; base64 bodies are decoded.
fn event_body(event: &Value) -> Vec<u8> {
    let raw = match event.get("body") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return other.to_string().into_bytes(),
    };

    let is_base64 = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !is_base64 {
        return raw.as_bytes().to_vec();
    }

    match STANDARD.decode(raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Body flagged as base64 but failed to decode: {e}");
            raw.as_bytes().to_vec()
        }
    }
}

fn str_at<'a>(event: &'a Value, pointer: &str) -> Option<&'a str> {
    event.pointer(pointer).and_then(Value::as_str)
}

/// Case-insensitive lookup in the event's `headers` object.
fn header(event: &Value, name: &str) -> Option<String> {
    event
        .get("headers")?
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_str())
        .map(str::to_string)
}
