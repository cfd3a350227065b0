use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub document_id: String,
    pub document_title: String,
    pub source_path: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub page: u32,
    pub chunk_index: u64,
    pub text: String,
}

/// A stored chunk returned from similarity search, ranked by cosine score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub page: u32,
    pub text: String,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

/// One completed pipeline turn: the generated answer with any link
/// follow-ups already appended, the restated question used for
/// retrieval when history was present, and the supporting chunks.
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    pub answer: String,
    pub standalone_question: Option<String>,
    pub sources: Vec<RetrievedChunk>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkingOptions {
    pub max_chars: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self { max_chars: 300 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    /// Number of chunks requested from the index per question.
    pub top_k: usize,
    /// Most recent turns included in the generation prompt. The stored
    /// session log itself is never truncated.
    pub history_window: usize,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            top_k: 10,
            history_window: 20,
        }
    }
}

/// Connection settings for the hosted Gemini embedding and generation
/// endpoints. Credentials come from `GEMINI_API_KEY`.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub embedding_model: String,
    pub generation_model: String,
}

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/embedding-001";
pub const DEFAULT_GENERATION_MODEL: &str = "models/gemini-2.0-flash";

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            api_key: api_key.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return None;
        }

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            let base = base.trim().trim_end_matches('/').to_string();
            if !base.is_empty() {
                config.api_base = base;
            }
        }
        Some(config)
    }
}
