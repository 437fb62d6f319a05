use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use super::{elapsed_ms, ApiRequest, ApiResponse};
use crate::errors::{ApiError, QUESTION_FAILED};
use crate::interactions::{log_interaction, Interaction};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub answer: String,
    pub session_id: String,
}

/// POST /question
///
/// Validates the body, asks the engine and records exactly one interaction,
/// whatever the outcome.
pub async fn handle_question(
    state: &AppState,
    request: &ApiRequest,
    session_id: &str,
    started: Instant,
) -> ApiResponse {
    info!("Received question request - Session: {session_id}");

    let (question, outcome) = match parse_question(&request.body) {
        Ok(question) => {
            info!(
                "Processing question - Session: {}, Question length: {}",
                session_id,
                question.chars().count()
            );
            let outcome = state.engine.answer(&question).await.map_err(ApiError::from);
            (question, outcome)
        }
        Err(e) => (String::new(), Err(e)),
    };

    let response_time_ms = elapsed_ms(started);

    match outcome {
        Ok(answer) => {
            log_interaction(
                state.interactions.as_ref(),
                &state.environment,
                Interaction {
                    session_id,
                    question: &question,
                    answer: &answer,
                    response_time_ms,
                    error: None,
                    client: &request.client,
                },
            );
            info!(
                "Successfully processed question - Session: {session_id}, ResponseTime: {response_time_ms}ms"
            );

            let body = QuestionResponse {
                answer,
                session_id: session_id.to_string(),
            };
            ApiResponse::json(200, json!(body))
        }
        Err(e) => {
            log_interaction(
                state.interactions.as_ref(),
                &state.environment,
                Interaction {
                    session_id,
                    question: &question,
                    answer: "",
                    response_time_ms,
                    error: Some(e.to_string()),
                    client: &request.client,
                },
            );
            error!("Error processing question - Session: {session_id}, Error: {e}");

            ApiResponse::json(
                e.status(),
                json!({
                    "error": QUESTION_FAILED,
                    "session_id": session_id,
                    "message": e.public_message(),
                }),
            )
        }
    }
}

/// Extracts a non-blank `question` from a JSON request body.
pub fn parse_question(body: &[u8]) -> Result<String, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::validation("No JSON data provided"));
    }

    let data: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("Invalid JSON in request body: {e}")))?;

    if is_empty_payload(&data) {
        return Err(ApiError::validation("No JSON data provided"));
    }

    match serde_json::from_value::<QuestionRequest>(data) {
        Ok(req) if !req.question.trim().is_empty() => Ok(req.question),
        _ => Err(ApiError::validation("No question provided")),
    }
}

fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
