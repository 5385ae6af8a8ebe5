//! # Text Chunking
//!
//! Splits long notes into pieces small enough to embed, preferring paragraph
//! boundaries over hard cuts.

use thiserror::Error;
use tracing::warn;

/// The target maximum size for a single chunk, in characters.
pub const CHUNK_SIZE_LIMIT: usize = 4096;

/// The character overlap between consecutive pieces of an oversized paragraph.
pub const CHUNK_OVERLAP: usize = 200;

#[derive(Error, Debug, PartialEq)]
pub enum ChunkError {
    #[error("Text content is empty or only whitespace")]
    EmptyContent,
    #[error("Chunk overlap ({overlap}) must be smaller than the chunk limit ({limit})")]
    InvalidOverlap { limit: usize, overlap: usize },
}

/// Chunks `text` with the default limit and overlap.
pub fn chunk_text(text: &str) -> Result<Vec<String>, ChunkError> {
    chunk_text_with(text, CHUNK_SIZE_LIMIT, CHUNK_OVERLAP)
}

/// Chunks `text` along paragraph boundaries (blank lines).
///
/// Consecutive paragraphs are packed into one chunk, joined by a blank line,
/// while the chunk stays within `limit` characters. A paragraph longer than
/// `limit` is cut into `limit`-sized windows that overlap by `overlap`
/// characters.
pub fn chunk_text_with(text: &str, limit: usize, overlap: usize) -> Result<Vec<String>, ChunkError> {
    if overlap >= limit {
        return Err(ChunkError::InvalidOverlap { limit, overlap });
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChunkError::EmptyContent);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in trimmed.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let len = paragraph.chars().count();
        if len > limit {
            warn!("Paragraph exceeds chunk size limit ({len} > {limit}). Splitting by character.");
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(split_long_text(paragraph, limit, overlap));
            continue;
        }

        if current.is_empty() {
            current.push_str(paragraph);
            current_len = len;
        } else if current_len + 2 + len <= limit {
            current.push_str("\n\n");
            current.push_str(paragraph);
            current_len += 2 + len;
        } else {
            chunks.push(std::mem::replace(&mut current, paragraph.to_string()));
            current_len = len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

fn split_long_text(text: &str, limit: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = limit - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + limit).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
