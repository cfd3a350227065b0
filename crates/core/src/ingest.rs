use crate::chunking::build_chunks;
use crate::error::IngestError;
use crate::extractor::extract_page_texts;
use crate::models::{ChunkingOptions, DocumentFingerprint, KnowledgeChunk};
use crate::traits::{Embedder, VectorIndex};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub struct IngestionReport {
    pub document: DocumentFingerprint,
    pub page_count: usize,
    pub chunk_count: usize,
}

pub fn digest_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn build_document_fingerprint(path: &Path) -> Result<DocumentFingerprint, IngestError> {
    let checksum = digest_file(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

    Ok(DocumentFingerprint {
        document_id: generate_document_id(path),
        document_title: name.to_string(),
        source_path: path.to_string_lossy().to_string(),
        checksum,
        ingested_at: Utc::now(),
    })
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extracts and chunks the knowledge document without touching the
/// index. Useful for inspecting what ingestion would store.
pub fn build_knowledge_chunks(
    path: &Path,
    options: ChunkingOptions,
) -> Result<(DocumentFingerprint, Vec<KnowledgeChunk>, usize), IngestError> {
    let fingerprint = build_document_fingerprint(path)?;
    let pages = extract_page_texts(path)?;
    let page_count = pages.len();
    let chunks = build_chunks(&fingerprint, &pages, options)?;
    Ok((fingerprint, chunks, page_count))
}

/// Full ingestion: extract, chunk, embed every chunk through the remote
/// service, and overwrite the persisted index. Re-running with the same
/// document rebuilds the index from scratch.
pub async fn ingest_document<E, V>(
    path: &Path,
    options: ChunkingOptions,
    embedder: &E,
    index: &V,
) -> Result<IngestionReport, IngestError>
where
    E: Embedder + Sync,
    V: VectorIndex + Sync,
{
    let (fingerprint, chunks, page_count) = build_knowledge_chunks(path, options)?;

    if chunks.is_empty() {
        return Err(IngestError::InvalidArgument(format!(
            "document produced no chunks: {}",
            path.display()
        )));
    }

    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    index
        .replace_all(
            embedder.model_id(),
            &fingerprint.checksum,
            &chunks,
            &embeddings,
        )
        .await?;

    Ok(IngestionReport {
        document: fingerprint,
        page_count,
        chunk_count: chunks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_knowledge_chunks, digest_file};
    use crate::error::IngestError;
    use crate::models::ChunkingOptions;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn checksum_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("data.pdf");
        fs::write(&file_path, b"abc")?;

        let first = digest_file(&file_path)?;
        let second = digest_file(&file_path)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn missing_document_fails_chunk_build() {
        let result = build_knowledge_chunks(
            Path::new("/nonexistent/data.pdf"),
            ChunkingOptions::default(),
        );
        assert!(matches!(result, Err(IngestError::Io(_))));
    }

    #[test]
    fn unreadable_document_fails_chunk_build() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("data.pdf");
        fs::write(&file_path, b"%PDF-1.4\n%broken")?;

        let result = build_knowledge_chunks(&file_path, ChunkingOptions::default());
        assert!(matches!(result, Err(IngestError::PdfParse(_))));
        Ok(())
    }
}
