//! # Search Form
//!
//! The question plus the options sent with it. Defaults mirror the web form:
//! web search on, three web results, five notes.

use crate::{api_client::QueryTransport, query_state::RagQuery};
use noterag::{QueryRequest, QueryResponse};
use tracing::debug;

pub const DEFAULT_WEB_SEARCH_RESULTS: u32 = 3;
pub const DEFAULT_TOP_K: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub use_web_search: bool,
    pub web_search_results: u32,
    pub top_k: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            query: String::new(),
            use_web_search: true,
            web_search_results: DEFAULT_WEB_SEARCH_RESULTS,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl SearchForm {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Builds the request body, or `None` when the question is blank.
    pub fn to_request(&self) -> Option<QueryRequest> {
        if self.query.trim().is_empty() {
            return None;
        }
        Some(QueryRequest {
            query: self.query.clone(),
            use_web_search: self.use_web_search,
            web_search_results: Some(self.web_search_results),
            top_k: Some(self.top_k),
        })
    }

    /// Submits the form through `controller`.
    ///
    /// A blank question is refused without touching the network or the
    /// controller state.
    pub async fn submit<T: QueryTransport>(
        &self,
        controller: &RagQuery<T>,
    ) -> Option<QueryResponse> {
        let Some(request) = self.to_request() else {
            debug!("Refusing to submit a blank question");
            return None;
        };
        controller.execute_query(&request).await
    }
}

/// The label of the submit control.
pub fn submit_label(is_loading: bool) -> &'static str {
    if is_loading {
        "Searching..."
    } else {
        "Search"
    }
}
