//! Structured interaction logging.
//!
//! Every request, on any route, yields exactly one [`InteractionRecord`], emitted as a
//! JSON line on the `chatbot_interactions` target plus a one-line summary.

use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

pub const INTERACTION_TARGET: &str = "chatbot_interactions";

/// Who sent the request, as far as the hosting surface can tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InteractionRecord {
    pub timestamp: String,
    pub session_id: String,
    pub question: String,
    pub answer: String,
    pub response_time_ms: u64,
    pub success: bool,
    pub error: Option<String>,
    pub user_agent: String,
    pub ip_address: String,
    pub environment: String,
}

/// Where interaction records go. Implementations must not fail the request.
pub trait InteractionSink: Send + Sync {
    fn record(&self, record: &InteractionRecord);
}

/// Default sink: one JSON line plus one summary line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl InteractionSink for TracingSink {
    fn record(&self, record: &InteractionRecord) {
        match serde_json::to_string(record) {
            Ok(line) => info!(target: INTERACTION_TARGET, "{line}"),
            Err(e) => warn!("Failed to serialize interaction record: {e}"),
        }

        info!(
            "CHATBOT_INTERACTION - Session: {}, ResponseTime: {}ms, Success: {}",
            record.session_id, record.response_time_ms, record.success
        );
    }
}

/// Keeps records in memory. Used by tests and local debugging.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<InteractionRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<InteractionRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl InteractionSink for MemorySink {
    fn record(&self, record: &InteractionRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
    }
}

/// Outcome of one handled request, before it is stamped into a record.
#[derive(Debug, Clone)]
pub struct Interaction<'a> {
    pub session_id: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
    pub response_time_ms: u64,
    pub error: Option<String>,
    pub client: &'a ClientMeta,
}

impl Interaction<'_> {
    pub fn into_record(self, environment: &str) -> InteractionRecord {
        InteractionRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            session_id: self.session_id.to_string(),
            question: self.question.to_string(),
            answer: self.answer.to_string(),
            response_time_ms: self.response_time_ms,
            success: self.error.is_none(),
            error: self.error,
            user_agent: self.client.user_agent.clone().unwrap_or_default(),
            ip_address: self.client.ip_address.clone().unwrap_or_default(),
            environment: environment.to_string(),
        }
    }
}

/// Stamps an interaction and hands it to the sink.
pub fn log_interaction(sink: &dyn InteractionSink, environment: &str, interaction: Interaction<'_>) {
    sink.record(&interaction.into_record(environment));
}
