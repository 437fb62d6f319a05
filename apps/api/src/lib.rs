pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
pub mod function;
pub mod interactions;
pub mod llm_client;
pub mod logging;
pub mod routes;
pub mod secrets;
pub mod state;

use std::sync::Arc;

use crate::config::Config;
use crate::engine::RetrievalEngine;
use crate::interactions::TracingSink;
use crate::llm_client::LlmClient;
use crate::state::AppState;

/// Wires the production engine and interaction sink from a resolved configuration.
pub fn build_state(config: &Config) -> AppState {
    let llm = LlmClient::new(
        config.credentials.openai_api_key().map(str::to_string),
        config.openai_base_url.clone(),
    );
    let engine = RetrievalEngine::new(llm, &config.index_dir);

    AppState::new(Arc::new(engine), Arc::new(TracingSink), config.environment.clone())
}
