use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use super::index::ResumeIndex;
use super::{AnswerEngine, EngineError};
use crate::llm_client::prompts::build_resume_prompt;
use crate::llm_client::LlmClient;

/// Number of chunks stuffed into the prompt.
pub const TOP_K: usize = 4;

/// Retrieval-augmented answer engine over a prebuilt résumé index.
///
/// The index is read on every call, so a missing or broken index fails the
/// request instead of the process.
#[derive(Clone)]
pub struct RetrievalEngine {
    llm: LlmClient,
    index_dir: PathBuf,
}

impl RetrievalEngine {
    pub fn new(llm: LlmClient, index_dir: impl Into<PathBuf>) -> Self {
        Self {
            llm,
            index_dir: index_dir.into(),
        }
    }
}

#[async_trait]
impl AnswerEngine for RetrievalEngine {
    async fn answer(&self, question: &str) -> Result<String, EngineError> {
        let index = ResumeIndex::load(&self.index_dir).await?;
        let query = self.llm.embed(question).await?;

        let hits = index.nearest(&query, TOP_K)?;
        debug!("Retrieved {} of {} chunks", hits.len(), index.chunks.len());

        let context: Vec<&str> = hits.iter().map(|c| c.text.as_str()).collect();
        let prompt = build_resume_prompt(&context, question);

        let answer = self.llm.complete(&prompt).await?;
        info!("Answer engine produced {} chars", answer.len());
        Ok(answer)
    }
}
