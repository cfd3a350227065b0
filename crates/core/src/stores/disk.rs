use crate::error::ChatError;
use crate::models::{KnowledgeChunk, RetrievedChunk};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    chunk_id: String,
    page: u32,
    text: String,
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexManifest {
    embedding_model: String,
    dimensions: usize,
    document_checksum: String,
    built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexFile {
    manifest: IndexManifest,
    records: Vec<StoredRecord>,
}

/// Local vector index persisted as a single JSON file inside a
/// directory. The index is rebuilt wholesale on ingestion and read-only
/// afterwards; the lock gives the build a single-writer barrier while
/// queries share read access.
pub struct DiskVectorStore {
    dir: PathBuf,
    state: RwLock<Option<IndexFile>>,
}

impl DiskVectorStore {
    /// Opens the store, loading any previously persisted index.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ChatError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let index_path = dir.join(INDEX_FILE);
        let state = if index_path.exists() {
            let bytes = std::fs::read(&index_path)?;
            Some(serde_json::from_slice(&bytes)?)
        } else {
            None
        };

        Ok(Self {
            dir,
            state: RwLock::new(state),
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.state
            .read()
            .ok()
            .and_then(|state| state.as_ref().map(|index| index.records.len()))
            .unwrap_or(0)
    }

    pub fn embedding_model(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.as_ref().map(|index| index.manifest.embedding_model.clone()))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn persist(&self, index: &IndexFile) -> Result<(), ChatError> {
        let tmp_path = self.dir.join(format!("{INDEX_FILE}.tmp"));
        let bytes = serde_json::to_vec(index)?;
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, self.index_path())?;
        Ok(())
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    let dot = left
        .iter()
        .zip(right.iter())
        .map(|(a, b)| a * b)
        .sum::<f32>();
    let left_norm = left.iter().map(|v| v * v).sum::<f32>().sqrt();
    let right_norm = right.iter().map(|v| v * v).sum::<f32>().sqrt();

    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    dot / (left_norm * right_norm)
}

fn lock_error() -> ChatError {
    ChatError::Request("vector index lock poisoned".to_string())
}

#[async_trait]
impl VectorIndex for DiskVectorStore {
    async fn replace_all(
        &self,
        model_id: &str,
        document_checksum: &str,
        chunks: &[KnowledgeChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), ChatError> {
        if chunks.len() != embeddings.len() {
            return Err(ChatError::Request(format!(
                "embedding count {} does not match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = embeddings.first().map(|vector| vector.len()).unwrap_or(0);
        for embedding in embeddings {
            if embedding.len() != dimensions {
                return Err(ChatError::DimensionMismatch {
                    expected: dimensions,
                    actual: embedding.len(),
                });
            }
        }

        let records = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| StoredRecord {
                chunk_id: chunk.chunk_id.clone(),
                page: chunk.page,
                text: chunk.text.clone(),
                embedding: embedding.clone(),
            })
            .collect();

        let index = IndexFile {
            manifest: IndexManifest {
                embedding_model: model_id.to_string(),
                dimensions,
                document_checksum: document_checksum.to_string(),
                built_at: Utc::now(),
            },
            records,
        };

        self.persist(&index)?;
        *self.state.write().map_err(|_| lock_error())? = Some(index);
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, ChatError> {
        let state = self.state.read().map_err(|_| lock_error())?;
        let index = state.as_ref().filter(|index| !index.records.is_empty());

        let Some(index) = index else {
            return Err(ChatError::EmptyIndex(format!(
                "vector index at {} has no records; run ingestion first",
                self.dir.display()
            )));
        };

        if vector.len() != index.manifest.dimensions {
            return Err(ChatError::DimensionMismatch {
                expected: index.manifest.dimensions,
                actual: vector.len(),
            });
        }

        let mut hits = index
            .records
            .iter()
            .map(|record| RetrievedChunk {
                chunk_id: record.chunk_id.clone(),
                page: record.page,
                text: record.text.clone(),
                score: cosine_similarity(vector, &record.embedding),
            })
            .collect::<Vec<_>>();

        hits.sort_by(|left, right| right.score.total_cmp(&left.score));
        hits.truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn chunk(id: &str, text: &str) -> KnowledgeChunk {
        KnowledgeChunk {
            chunk_id: id.to_string(),
            document_id: "doc-1".to_string(),
            page: 1,
            chunk_index: 0,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn query_returns_records_ranked_by_similarity() -> Result<(), ChatError> {
        let dir = tempdir()?;
        let store = DiskVectorStore::open(dir.path())?;

        let chunks = vec![chunk("a", "pizza prices"), chunk("b", "opening hours")];
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        store
            .replace_all("models/embedding-001", "checksum", &chunks, &embeddings)
            .await?;

        let hits = store.query(&[0.1, 0.9], 10).await?;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk_id, "b");
        assert!(hits[0].score > hits[1].score);
        Ok(())
    }

    #[tokio::test]
    async fn query_never_exceeds_k() -> Result<(), ChatError> {
        let dir = tempdir()?;
        let store = DiskVectorStore::open(dir.path())?;

        let chunks = vec![
            chunk("a", "one"),
            chunk("b", "two"),
            chunk("c", "three"),
        ];
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]];
        store
            .replace_all("models/embedding-001", "checksum", &chunks, &embeddings)
            .await?;

        assert_eq!(store.query(&[1.0, 0.0], 2).await?.len(), 2);
        // k larger than the corpus returns everything available
        assert_eq!(store.query(&[1.0, 0.0], 50).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn empty_index_reports_no_knowledge() -> Result<(), ChatError> {
        let dir = tempdir()?;
        let store = DiskVectorStore::open(dir.path())?;

        let result = store.query(&[1.0, 0.0], 5).await;
        assert!(matches!(result, Err(ChatError::EmptyIndex(_))));
        Ok(())
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() -> Result<(), ChatError> {
        let dir = tempdir()?;
        let store = DiskVectorStore::open(dir.path())?;

        store
            .replace_all(
                "models/embedding-001",
                "checksum",
                &[chunk("a", "text")],
                &[vec![1.0, 0.0, 0.0]],
            )
            .await?;

        let result = store.query(&[1.0, 0.0], 5).await;
        assert!(matches!(
            result,
            Err(ChatError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn index_survives_reopen_and_rebuild_overwrites() -> Result<(), ChatError> {
        let dir = tempdir()?;

        {
            let store = DiskVectorStore::open(dir.path())?;
            store
                .replace_all(
                    "models/embedding-001",
                    "first",
                    &[chunk("a", "old"), chunk("b", "older")],
                    &[vec![1.0, 0.0], vec![0.0, 1.0]],
                )
                .await?;
        }

        let reopened = DiskVectorStore::open(dir.path())?;
        assert_eq!(reopened.chunk_count(), 2);
        assert_eq!(
            reopened.embedding_model().as_deref(),
            Some("models/embedding-001")
        );

        reopened
            .replace_all(
                "models/embedding-001",
                "second",
                &[chunk("c", "new")],
                &[vec![0.5, 0.5]],
            )
            .await?;
        assert_eq!(reopened.chunk_count(), 1);

        let hits = reopened.query(&[0.5, 0.5], 10).await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk_id, "c");
        Ok(())
    }

    #[test]
    fn cosine_similarity_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        let aligned = cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]);
        assert!((aligned - 1.0).abs() < 1e-6);
    }
}
