use std::sync::Arc;

use crate::engine::AnswerEngine;
use crate::interactions::InteractionSink;

/// Shared application state: everything a request needs, immutable after startup.
/// Both the HTTP server and the function handler dispatch through it.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn AnswerEngine>,
    pub interactions: Arc<dyn InteractionSink>,
    /// Deployment environment name reported by `/health` and interaction records.
    pub environment: String,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn AnswerEngine>,
        interactions: Arc<dyn InteractionSink>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            interactions,
            environment: environment.into(),
        }
    }
}
