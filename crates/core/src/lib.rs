pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod generation;
pub mod ingest;
pub mod menu;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod stores;
pub mod traits;

pub use chunking::{build_chunks, normalize_whitespace, split_page};
pub use embeddings::GeminiEmbedder;
pub use error::{ChatError, IngestError, MenuError};
pub use extractor::{extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use generation::GeminiGenerator;
pub use ingest::{build_knowledge_chunks, ingest_document, IngestionReport};
pub use menu::{Menu, MenuCategory, MenuItem};
pub use models::{
    ChatAnswer, ChatOptions, ChunkingOptions, ConversationTurn, DocumentFingerprint, GeminiConfig,
    KnowledgeChunk, RetrievedChunk, TurnRole,
};
pub use pipeline::ChatPipeline;
pub use prompt::{link_followups, BOOKING_FORM_URL, CONTACT, LOCATION, RESTAURANT_NAME, TIMINGS};
pub use session::ChatSession;
pub use stores::DiskVectorStore;
pub use traits::{ChatModel, Embedder, VectorIndex};
