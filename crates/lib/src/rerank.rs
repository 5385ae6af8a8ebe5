//! # Rerank Logic
//!
//! A cheap, deterministic re-ranker applied to vector-store hits before they
//! are handed to the model. Each document is scored from two signals:
//! - how many of the query's keywords appear in its content;
//! - whether it carries a `source` in its metadata.

use crate::types::Document;
use tracing::debug;

/// Words that carry no retrieval signal.
const COMMON_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "what", "which", "how",
];

const KEYWORD_WEIGHT: f64 = 0.5;
const SOURCE_WEIGHT: f64 = 0.5;

/// Extracts the lower-cased keywords of a query: words longer than three
/// characters that are not common filler words.
pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !COMMON_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

fn keyword_score(content: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.5;
    }
    let content = content.to_lowercase();
    let matches = keywords
        .iter()
        .filter(|keyword| content.contains(keyword.as_str()))
        .count();
    matches as f64 / keywords.len() as f64
}

fn source_score(doc: &Document) -> f64 {
    if doc.metadata.contains_key("source") {
        0.7
    } else {
        0.5
    }
}

/// Scores a single document against a set of keywords.
pub fn score_document(doc: &Document, keywords: &[String]) -> f64 {
    keyword_score(&doc.content, keywords) * KEYWORD_WEIGHT + source_score(doc) * SOURCE_WEIGHT
}

/// Reorders `documents` by descending score. Ties keep their original order.
pub fn keyword_rerank(query: &str, documents: Vec<Document>) -> Vec<Document> {
    if documents.len() < 2 {
        return documents;
    }
    let keywords = extract_keywords(query);
    debug!(?keywords, "Re-ranking {} documents", documents.len());

    let mut scored: Vec<(f64, Document)> = documents
        .into_iter()
        .map(|doc| (score_document(&doc, &keywords), doc))
        .collect();
    // `sort_by` is stable.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, doc)| doc).collect()
}
