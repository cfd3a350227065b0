use crate::error::ChatError;
use crate::models::{ConversationTurn, KnowledgeChunk, RetrievedChunk};
use async_trait::async_trait;

/// Remote embedding service. The same implementation must be used at
/// indexing and at query time or similarity scores are meaningless.
#[async_trait]
pub trait Embedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ChatError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Identifier recorded in the index manifest so a rebuilt index can
    /// be checked against the query-time embedder.
    fn model_id(&self) -> &str;
}

#[async_trait]
pub trait VectorIndex {
    /// Replaces the persisted index with the given chunks. Re-running
    /// ingestion overwrites whatever was stored before.
    async fn replace_all(
        &self,
        model_id: &str,
        document_checksum: &str,
        chunks: &[KnowledgeChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), ChatError>;

    /// Top-k cosine similarity search. Returns all records when `k`
    /// exceeds the corpus size; errors when the index is empty.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, ChatError>;
}

/// Remote completion service behind the answer generator.
#[async_trait]
pub trait ChatModel {
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ConversationTurn],
        user_message: &str,
    ) -> Result<String, ChatError>;
}
