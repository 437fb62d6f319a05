//! The answer engine: question in, answer out.
//!
//! Handlers only see the [`AnswerEngine`] trait. The production implementation
//! is [`RetrievalEngine`], which searches a prebuilt résumé index and completes
//! a fixed prompt against the closest chunks.

pub mod index;
pub mod retrieval;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::LlmError;

pub use retrieval::RetrievalEngine;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Vector index not found at {0}")]
    IndexMissing(String),

    #[error("Failed to read vector index: {0}")]
    IndexRead(#[from] std::io::Error),

    #[error("Vector index is malformed: {0}")]
    IndexFormat(#[from] serde_json::Error),

    #[error("Vector index contains no chunks")]
    IndexEmpty,

    #[error("Embedding dimension mismatch: index has {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Answers a free-text question about the indexed résumé.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, EngineError>;
}
