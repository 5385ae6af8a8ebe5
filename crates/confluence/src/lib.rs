//! # `noterag-confluence`: Confluence Space Reader
//!
//! Pulls every page of one or more Confluence spaces through the REST API,
//! turns the rendered HTML into plain text and hands the chunks to the
//! `noterag` ingestion pipeline. It feeds the same vector store as the
//! Markdown reader.

use async_trait::async_trait;
use noterag::{
    ingest::{chunk_text, ChunkError, DocumentReader, IngestError},
    Document,
};
use reqwest::Client as ReqwestClient;
use scraper::{ElementRef, Html};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Pages requested per call to the content endpoint.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

const CONTENT_PATH: &str = "/rest/api/content";

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "hr", "li", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "pre",
    "blockquote", "table", "ul", "ol", "section",
];

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum ConfluenceError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Request to Confluence failed: {0}")]
    Request(reqwest::Error),
    #[error("Confluence returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected Confluence response: {0}")]
    Decode(String),
}

impl From<ConfluenceError> for IngestError {
    fn from(err: ConfluenceError) -> Self {
        match err {
            ConfluenceError::Decode(msg) => IngestError::Parse(msg),
            e => IngestError::Fetch(e.to_string()),
        }
    }
}

// --- API Types ---

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    results: Vec<ContentResult>,
    #[serde(rename = "_links", default)]
    links: ContentLinks,
}

#[derive(Deserialize, Debug, Default)]
struct ContentLinks {
    next: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ContentResult {
    id: String,
    #[serde(default)]
    title: String,
    body: Option<ContentBody>,
}

#[derive(Deserialize, Debug)]
struct ContentBody {
    view: Option<BodyValue>,
}

#[derive(Deserialize, Debug)]
struct BodyValue {
    #[serde(default)]
    value: String,
}

/// One Confluence page with its body already reduced to plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfluencePage {
    pub id: String,
    pub title: String,
    pub content: String,
}

// --- HTML to Text ---

/// Reduces rendered Confluence HTML to plain text. Block elements become
/// paragraphs separated by a blank line; whitespace inside a paragraph is
/// collapsed. Scripts and styles are dropped.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    collect_text(fragment.root_element(), &mut current, &mut paragraphs);
    flush_paragraph(&mut current, &mut paragraphs);
    paragraphs.join("\n\n")
}

fn collect_text(element: ElementRef<'_>, current: &mut String, paragraphs: &mut Vec<String>) {
    let name = element.value().name();
    if name == "script" || name == "style" {
        return;
    }
    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        flush_paragraph(current, paragraphs);
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, current, paragraphs);
        }
    }
    if block {
        flush_paragraph(current, paragraphs);
    }
}

fn flush_paragraph(current: &mut String, paragraphs: &mut Vec<String>) {
    let paragraph = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !paragraph.is_empty() {
        paragraphs.push(paragraph);
    }
    current.clear();
}

// --- Client ---

/// Connection settings for a Confluence site.
#[derive(Debug, Clone)]
pub struct ConfluenceSettings {
    /// The site root, e.g. `https://example.atlassian.net/wiki`.
    pub base_url: String,
    /// An API token. Sent as basic auth together with `email` when one is
    /// given, otherwise as a bearer token.
    pub token: Option<String>,
    pub email: Option<String>,
    pub page_limit: usize,
    pub timeout: Option<Duration>,
}

/// A thin client over the Confluence content API.
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    client: ReqwestClient,
    base_url: String,
    token: Option<String>,
    email: Option<String>,
    page_limit: usize,
}

impl ConfluenceClient {
    pub fn new(settings: &ConfluenceSettings) -> Result<Self, ConfluenceError> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfluenceError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone().filter(|t| !t.is_empty()),
            email: settings.email.clone().filter(|e| !e.is_empty()),
            page_limit: settings.page_limit.max(1),
        })
    }

    /// Fetches every page of `space_key`, following `_links.next` until the
    /// last page of results.
    pub async fn pages_in_space(
        &self,
        space_key: &str,
    ) -> Result<Vec<ConfluencePage>, ConfluenceError> {
        let mut pages = Vec::new();
        let mut next_url = Some(format!(
            "{}{CONTENT_PATH}?type=page&spaceKey={space_key}&start=0&limit={}&expand=body.view",
            self.base_url, self.page_limit
        ));

        while let Some(url) = next_url.take() {
            debug!("--> Fetching Confluence content: {url}");
            let response = self.fetch(&url).await?;
            for result in response.results {
                let html = result
                    .body
                    .and_then(|b| b.view)
                    .map(|v| v.value)
                    .unwrap_or_default();
                debug!("Added page: {} - {}", result.title, result.id);
                pages.push(ConfluencePage {
                    id: result.id,
                    title: result.title,
                    content: html_to_text(&html),
                });
            }
            next_url = response.links.next.map(|next| self.resolve(&next));
        }

        info!(
            "Completed scraping {} Confluence pages from space {space_key}",
            pages.len()
        );
        Ok(pages)
    }

    async fn fetch(&self, url: &str) -> Result<ContentResponse, ConfluenceError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        request = match (&self.email, &self.token) {
            (Some(email), token) => request.basic_auth(email, token.as_deref()),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        };

        let response = request.send().await.map_err(ConfluenceError::Request)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ConfluenceError::Status { status, body });
        }
        let text = response.text().await.map_err(ConfluenceError::Request)?;
        serde_json::from_str(&text).map_err(|e| ConfluenceError::Decode(e.to_string()))
    }

    /// `_links.next` is relative to the site root.
    fn resolve(&self, next: &str) -> String {
        if next.starts_with("http://") || next.starts_with("https://") {
            next.to_string()
        } else {
            format!("{}{next}", self.base_url)
        }
    }
}

// --- Reader ---

/// Reads the pages of a list of spaces into chunked documents.
pub struct ConfluenceReader {
    client: ConfluenceClient,
    spaces: Vec<String>,
}

impl ConfluenceReader {
    pub fn new(client: ConfluenceClient, spaces: Vec<String>) -> Self {
        Self { client, spaces }
    }

    /// Splits one page into documents tagged with its space, id and title.
    /// Pages without text yield nothing.
    pub fn page_to_documents(&self, page: &ConfluencePage, space: &str) -> Vec<Document> {
        let chunks = match chunk_text(&page.content) {
            Ok(chunks) => chunks,
            Err(ChunkError::EmptyContent) => {
                debug!("Skipping empty Confluence page {}", page.id);
                return Vec::new();
            }
            // The default limits are always valid.
            Err(ChunkError::InvalidOverlap { .. }) => return Vec::new(),
        };

        let mut base = Map::new();
        base.insert("source".to_string(), Value::from("confluence"));
        base.insert("space".to_string(), Value::from(space));
        base.insert("pageId".to_string(), Value::from(page.id.clone()));
        base.insert("title".to_string(), Value::from(page.title.clone()));

        chunks
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                let id = Uuid::new_v5(
                    &Uuid::NAMESPACE_URL,
                    format!("confluence:{space}:{}#chunk_{index}", page.id).as_bytes(),
                );
                let mut metadata = base.clone();
                metadata.insert("chunk_index".to_string(), Value::from(index));
                Document {
                    id: id.to_string(),
                    content,
                    metadata,
                }
            })
            .collect()
    }
}

#[async_trait]
impl DocumentReader for ConfluenceReader {
    fn source(&self) -> String {
        format!("confluence:{}", self.spaces.join(","))
    }

    async fn read_documents(&self) -> Result<Vec<Document>, IngestError> {
        info!("Starting Confluence scraping for spaces {:?}", self.spaces);
        let mut documents = Vec::new();
        for space in &self.spaces {
            let pages = self.client.pages_in_space(space).await?;
            info!("Retrieved {} Confluence pages from {space}", pages.len());
            for page in &pages {
                documents.extend(self.page_to_documents(page, space));
            }
        }
        Ok(documents)
    }
}
