use crate::{
    errors::RagError,
    providers::{ai::AiProvider, db::DocumentRepository, web::WebSearchProvider},
};
use serde::Deserialize;
use std::sync::Arc;

fn default_top_k() -> u32 {
    5
}

fn default_max_top_k() -> u32 {
    50
}

fn default_web_search_results() -> u32 {
    3
}

fn default_max_web_search_results() -> u32 {
    10
}

/// Defaults and upper bounds applied to the optional request fields.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RagDefaults {
    #[serde(default = "default_top_k")]
    pub default_top_k: u32,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: u32,
    #[serde(default = "default_web_search_results")]
    pub default_web_search_results: u32,
    #[serde(default = "default_max_web_search_results")]
    pub max_web_search_results: u32,
}

impl Default for RagDefaults {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            default_web_search_results: default_web_search_results(),
            max_web_search_results: default_max_web_search_results(),
        }
    }
}

/// Answers questions by combining retrieved context with a language model.
///
/// Build one at startup with `RagClientBuilder` and share it; it holds no
/// per-request state.
#[derive(Clone, Debug)]
pub struct RagClient {
    pub ai_provider: Box<dyn AiProvider>,
    pub document_repository: Option<Arc<dyn DocumentRepository>>,
    pub web_search: Option<Box<dyn WebSearchProvider>>,
    pub defaults: RagDefaults,
}

/// A builder for creating `RagClient` instances.
#[derive(Default)]
pub struct RagClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    document_repository: Option<Arc<dyn DocumentRepository>>,
    web_search: Option<Box<dyn WebSearchProvider>>,
    defaults: RagDefaults,
}

impl RagClientBuilder {
    /// Creates a new `RagClientBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use noterag::RagClientBuilder;
    ///
    /// let builder = RagClientBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    pub fn document_repository(mut self, repository: Arc<dyn DocumentRepository>) -> Self {
        self.document_repository = Some(repository);
        self
    }

    pub fn web_search(mut self, provider: Box<dyn WebSearchProvider>) -> Self {
        self.web_search = Some(provider);
        self
    }

    pub fn defaults(mut self, defaults: RagDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builds the `RagClient`.
    ///
    /// Fails with `RagError::MissingAiProvider` if no AI provider was set.
    /// The document repository and web search are optional.
    pub fn build(self) -> Result<RagClient, RagError> {
        let ai_provider = self.ai_provider.ok_or(RagError::MissingAiProvider)?;
        Ok(RagClient {
            ai_provider,
            document_repository: self.document_repository,
            web_search: self.web_search,
            defaults: self.defaults,
        })
    }
}
