use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::EngineError;

/// File inside the index directory holding the serialized chunks.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A prebuilt résumé index: document chunks with their embeddings.
/// Produced offline; read-only while serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeIndex {
    pub model: String,
    pub chunks: Vec<IndexedChunk>,
}

impl ResumeIndex {
    pub fn path_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(INDEX_FILE)
    }

    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = Self::path_in(dir);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::IndexMissing(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let index: ResumeIndex = serde_json::from_slice(&raw)?;
        if index.chunks.is_empty() {
            return Err(EngineError::IndexEmpty);
        }
        Ok(index)
    }

    /// Returns the `k` chunks nearest to `query` by Euclidean distance, closest first.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<&IndexedChunk>, EngineError> {
        let mut scored = Vec::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            if chunk.embedding.len() != query.len() {
                return Err(EngineError::DimensionMismatch {
                    expected: chunk.embedding.len(),
                    actual: query.len(),
                });
            }
            scored.push((squared_l2(&chunk.embedding, query), chunk));
        }

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(scored.into_iter().take(k).map(|(_, c)| c).collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, embedding: &[f32]) -> IndexedChunk {
        IndexedChunk {
            text: text.to_string(),
            embedding: embedding.to_vec(),
        }
    }

    fn sample_index() -> ResumeIndex {
        ResumeIndex {
            model: "text-embedding-ada-002".to_string(),
            chunks: vec![
                chunk("education", &[0.0, 1.0]),
                chunk("ai experience", &[1.0, 0.0]),
                chunk("hobbies", &[-1.0, 0.0]),
            ],
        }
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let index = sample_index();
        let hits = index.nearest(&[0.9, 0.1], 2).unwrap();
        let texts: Vec<_> = hits.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["ai experience", "education"]);
    }

    #[test]
    fn test_nearest_caps_at_index_size() {
        let index = sample_index();
        assert_eq!(index.nearest(&[0.0, 0.0], 10).unwrap().len(), 3);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let index = sample_index();
        let err = index.nearest(&[1.0, 0.0, 0.0], 2).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_load_roundtrips_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let raw = serde_json::to_vec(&sample_index()).unwrap();
        std::fs::write(ResumeIndex::path_in(dir.path()), raw).unwrap();

        let index = ResumeIndex::load(dir.path()).await.unwrap();
        assert_eq!(index.chunks.len(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResumeIndex::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, EngineError::IndexMissing(_)));
    }

    #[tokio::test]
    async fn test_load_rejects_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            ResumeIndex::path_in(dir.path()),
            r#"{"model":"text-embedding-ada-002","chunks":[]}"#,
        )
        .unwrap();

        let err = ResumeIndex::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, EngineError::IndexEmpty));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(ResumeIndex::path_in(dir.path()), "not json").unwrap();

        let err = ResumeIndex::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, EngineError::IndexFormat(_)));
    }
}
