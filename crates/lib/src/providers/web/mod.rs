pub mod searxng;
pub mod tavily;

use crate::{errors::RagError, types::WebSearchResult};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use searxng::SearxngProvider;
pub use tavily::TavilyProvider;

/// A trait for a web-search backend.
#[async_trait]
pub trait WebSearchProvider: Send + Sync + Debug + DynClone {
    /// Returns at most `max_results` results for `query`.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, RagError>;
}

dyn_clone::clone_trait_object!(WebSearchProvider);
