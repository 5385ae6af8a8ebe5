//! # Keyword Re-ranking Tests

use noterag::{
    rerank::{extract_keywords, keyword_rerank, score_document},
    Document,
};

fn doc(content: &str) -> Document {
    Document::new(content)
}

#[test]
fn test_extract_keywords_drops_short_and_common_words() {
    let keywords = extract_keywords("What is the Best way with Ownership in Rust");
    assert_eq!(keywords, vec!["best", "ownership", "rust"]);
}

#[test]
fn test_score_uses_neutral_keyword_score_without_keywords() {
    // No keyword survives filtering, so the keyword score is 0.5.
    let keywords = extract_keywords("how is it");
    assert!(keywords.is_empty());
    let score = score_document(&doc("anything"), &keywords);
    assert!((score - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_score_rewards_documents_with_a_source() {
    let keywords = extract_keywords("tokio runtime");
    let plain = doc("The tokio runtime drives futures.");
    let sourced = plain.clone().with_metadata("source", "notes/tokio.md");

    // 1.0 * 0.5 + 0.5 * 0.5 vs 1.0 * 0.5 + 0.7 * 0.5
    assert!((score_document(&plain, &keywords) - 0.75).abs() < 1e-9);
    assert!((score_document(&sourced, &keywords) - 0.85).abs() < 1e-9);
}

#[test]
fn test_rerank_orders_by_keyword_coverage() {
    let documents = vec![
        doc("Nothing relevant here."),
        doc("Mentions tokio only."),
        doc("Explains the tokio runtime scheduler."),
    ];

    let ranked = keyword_rerank("tokio runtime scheduler", documents);

    assert_eq!(ranked[0].content, "Explains the tokio runtime scheduler.");
    assert_eq!(ranked[1].content, "Mentions tokio only.");
    assert_eq!(ranked[2].content, "Nothing relevant here.");
}

#[test]
fn test_rerank_is_stable_for_equal_scores() {
    let documents = vec![doc("first"), doc("second"), doc("third")];

    let ranked = keyword_rerank("unrelated words", documents);

    let order: Vec<&str> = ranked.iter().map(|d| d.content.as_str()).collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}
