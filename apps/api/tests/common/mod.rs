#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use resume_bot::engine::{AnswerEngine, EngineError};
use resume_bot::interactions::MemorySink;
use resume_bot::state::AppState;

/// Engine double: answers with a fixed string, or fails when built with `failing()`.
pub struct StubEngine {
    answer: Option<String>,
    pub calls: AtomicUsize,
}

impl StubEngine {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerEngine for StubEngine {
    async fn answer(&self, _question: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or_else(|| EngineError::IndexMissing("faiss_index/index.json".to_string()))
    }
}

pub struct Harness {
    pub state: AppState,
    pub engine: Arc<StubEngine>,
    pub sink: Arc<MemorySink>,
}

pub fn harness(engine: StubEngine) -> Harness {
    let engine = Arc::new(engine);
    let sink = Arc::new(MemorySink::default());
    let state = AppState::new(engine.clone(), sink.clone(), "test");
    Harness {
        state,
        engine,
        sink,
    }
}

pub fn is_uuid(value: &serde_json::Value) -> bool {
    value
        .as_str()
        .map(|s| uuid::Uuid::parse_str(s).is_ok())
        .unwrap_or(false)
}
