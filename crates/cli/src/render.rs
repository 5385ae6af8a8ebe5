//! Plain-text rendering of answers and errors.

use noterag::{QueryResponse, Source};
use std::fmt::Write;

pub const WEB_SEARCH_USED: &str = "Web search used";
pub const LOCAL_KNOWLEDGE_ONLY: &str = "Local knowledge only";

/// Exactly one of the two provenance labels.
pub fn provenance_label(response: &QueryResponse) -> &'static str {
    if response.web_search_used {
        WEB_SEARCH_USED
    } else {
        LOCAL_KNOWLEDGE_ONLY
    }
}

pub fn render_response(response: &QueryResponse) -> String {
    format!(
        "Answer:\n{}\n\n{} | {} sources",
        response.answer.trim_end(),
        provenance_label(response),
        response.sources_count
    )
}

/// Lists the source previews returned by the server, one per line.
pub fn render_sources(sources: &[Source]) -> String {
    let mut out = String::new();
    for (i, source) in sources.iter().enumerate() {
        let origin = source
            .metadata
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let preview = source.content.replace('\n', " ");
        let _ = writeln!(out, "[{}] {origin}: {preview}", i + 1);
    }
    out
}

pub fn render_error(message: &str) -> String {
    format!("Error: {message}")
}
