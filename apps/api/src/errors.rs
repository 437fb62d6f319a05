use thiserror::Error;

use crate::engine::EngineError;

/// Failures inside question processing.
/// Routing misses are not errors; the router answers those with a 404 directly.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Answer engine error: {0}")]
    Engine(#[from] EngineError),
}

/// `error` field of every failed question response.
pub const QUESTION_FAILED: &str = "Failed to process question";

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// HTTP status for this error.
    /// Validation failures stay 500 to keep the established client contract.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 500,
            ApiError::Engine(_) => 500,
        }
    }

    /// The message safe to return to the caller. Engine internals are logged, not returned.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Engine(e) => {
                tracing::error!("Answer engine error: {e}");
                "An AI processing error occurred".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_public() {
        let err = ApiError::validation("No question provided");
        assert_eq!(err.status(), 500);
        assert_eq!(err.public_message(), "No question provided");
        assert_eq!(err.to_string(), "No question provided");
    }

    #[test]
    fn test_engine_details_are_hidden() {
        let err = ApiError::from(EngineError::IndexMissing("/srv/faiss_index/index.json".into()));
        assert_eq!(err.status(), 500);
        assert!(!err.public_message().contains("/srv"));
        assert!(err.to_string().contains("/srv/faiss_index"));
    }
}
