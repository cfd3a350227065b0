use crate::error::IngestError;
use crate::extractor::PageText;
use crate::models::{ChunkingOptions, DocumentFingerprint, KnowledgeChunk};
use sha2::{Digest, Sha256};

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
}

/// Splits normalized text into pieces of at most `max_chars` characters
/// without breaking mid-word. A page shorter than `max_chars` yields
/// exactly one piece; a single word longer than `max_chars` becomes its
/// own oversized piece rather than being cut.
pub fn split_page(normalized: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in normalized.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Chunks every page of the document in order, assigning stable ids.
pub fn build_chunks(
    document: &DocumentFingerprint,
    pages: &[PageText],
    options: ChunkingOptions,
) -> Result<Vec<KnowledgeChunk>, IngestError> {
    if options.max_chars == 0 {
        return Err(IngestError::InvalidChunkConfig(
            "max_chars must be greater than zero".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut cursor = 0u64;

    for page in pages {
        let normalized = normalize_whitespace(&page.text);
        if normalized.is_empty() {
            continue;
        }

        for piece in split_page(&normalized, options.max_chars) {
            let chunk_id = make_chunk_id(&document.document_id, page.number, cursor, &piece);
            chunks.push(KnowledgeChunk {
                chunk_id,
                document_id: document.document_id.clone(),
                page: page.number,
                chunk_index: cursor,
                text: piece,
            });
            cursor = cursor.saturating_add(1);
        }
    }

    Ok(chunks)
}

fn make_chunk_id(document_id: &str, page: u32, index: u64, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    hasher.update(page.to_le_bytes());
    hasher.update(index.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fingerprint() -> DocumentFingerprint {
        DocumentFingerprint {
            document_id: "doc-1".to_string(),
            document_title: "data.pdf".to_string(),
            source_path: "/tmp/data.pdf".to_string(),
            checksum: "checksum".to_string(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn whitespace_is_normalized() {
        let input = "A  \t  lot\nof   spacing";
        assert_eq!(normalize_whitespace(input), "A lot of spacing");
    }

    #[test]
    fn short_page_yields_exactly_one_chunk() {
        let pieces = split_page("open noon to midnight daily", 300);
        assert_eq!(pieces, vec!["open noon to midnight daily".to_string()]);
    }

    #[test]
    fn pieces_respect_word_boundaries_and_max_length() {
        let text = "the quick brown fox jumps over the lazy dog near the riverbank";
        let pieces = split_page(text, 20);

        for piece in &pieces {
            assert!(piece.chars().count() <= 20, "oversized piece: {piece:?}");
            assert!(!piece.starts_with(' ') && !piece.ends_with(' '));
        }
    }

    #[test]
    fn rejoined_pieces_reproduce_normalized_text() {
        let text = "Booking is available every day.\nCall ahead\tfor platters   and family deals.";
        let normalized = normalize_whitespace(text);
        let pieces = split_page(&normalized, 16);
        assert_eq!(pieces.join(" "), normalized);
    }

    #[test]
    fn oversized_word_becomes_its_own_chunk() {
        let pieces = split_page("a supercalifragilistic b", 5);
        assert_eq!(
            pieces,
            vec![
                "a".to_string(),
                "supercalifragilistic".to_string(),
                "b".to_string()
            ]
        );
    }

    #[test]
    fn chunks_preserve_page_order() -> Result<(), IngestError> {
        let pages = vec![
            PageText {
                number: 1,
                text: "first page menu items".to_string(),
            },
            PageText {
                number: 2,
                text: "second page booking details".to_string(),
            },
        ];

        let chunks = build_chunks(&fingerprint(), &pages, ChunkingOptions { max_chars: 12 })?;

        assert!(!chunks.is_empty());
        let page_sequence: Vec<u32> = chunks.iter().map(|chunk| chunk.page).collect();
        let mut sorted = page_sequence.clone();
        sorted.sort_unstable();
        assert_eq!(page_sequence, sorted);

        let indexes: Vec<u64> = chunks.iter().map(|chunk| chunk.chunk_index).collect();
        assert_eq!(indexes, (0..chunks.len() as u64).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn zero_max_chars_is_rejected() {
        let pages = vec![PageText {
            number: 1,
            text: "anything".to_string(),
        }];
        let result = build_chunks(&fingerprint(), &pages, ChunkingOptions { max_chars: 0 });
        assert!(matches!(result, Err(IngestError::InvalidChunkConfig(_))));
    }
}
