//! # `noterag-markdown`: Markdown Folder Reader
//!
//! Reads a folder of Markdown notes into `Document`s for the `noterag`
//! ingestion pipeline. Each file is cleaned, chunked and tagged with metadata
//! describing where it came from and how it is structured.

use async_trait::async_trait;
use noterag::{
    ingest::{chunk_text, ChunkError, DocumentReader, IngestError},
    Document,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum MarkdownIngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("Failed to chunk '{path}': {source}")]
    Chunk { path: String, source: ChunkError },
}

// --- Metadata Extraction ---

/// Structural facts about a single note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteMetadata {
    pub title: String,
    pub headers: Vec<String>,
    pub code_block_count: usize,
}

struct Patterns {
    title: Regex,
    header: Regex,
    code_block: Regex,
    heading_without_space: Regex,
    inline_whitespace: Regex,
}

impl Patterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            title: Regex::new(r"(?m)^#[ \t]+(.+?)\s*$")?,
            header: Regex::new(r"(?m)^#{1,6}[ \t]+(.+?)\s*$")?,
            code_block: Regex::new(r"```[\s\S]*?```")?,
            heading_without_space: Regex::new(r"(?m)^(#{1,6})([^#\s])")?,
            inline_whitespace: Regex::new(r"[ \t]+")?,
        })
    }
}

/// Derives a title from a file name: the stem with `-` and `_` turned into spaces.
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| filename.into());
    stem.replace(['-', '_'], " ")
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

// --- Reader ---

/// Walks a folder recursively and turns every `*.md` file into chunked documents.
pub struct MarkdownFolderReader {
    folder: PathBuf,
    patterns: Patterns,
}

impl MarkdownFolderReader {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, MarkdownIngestError> {
        Ok(Self {
            folder: folder.into(),
            patterns: Patterns::new()?,
        })
    }

    /// Lists the Markdown files under the folder, sorted by path.
    /// A missing folder yields an empty list.
    pub fn find_markdown_files(&self) -> Vec<PathBuf> {
        if !self.folder.is_dir() {
            error!(
                "Knowledge base folder does not exist or is not a directory: {}",
                self.folder.display()
            );
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.folder)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && is_markdown(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();
        debug!("Found {} markdown files in {}", files.len(), self.folder.display());
        files
    }

    /// Extracts the title, headings and code block count of a note. Lines
    /// inside fenced code blocks are not treated as headings.
    pub fn extract_metadata(&self, content: &str, filename: &str) -> NoteMetadata {
        let code_block_count = self.patterns.code_block.find_iter(content).count();
        let prose = self.patterns.code_block.replace_all(content, "");

        let title = self
            .patterns
            .title
            .captures(&prose)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| title_from_filename(filename));
        let headers = self
            .patterns
            .header
            .captures_iter(&prose)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        NoteMetadata {
            title,
            headers,
            code_block_count,
        }
    }

    /// Normalises whitespace while keeping paragraph breaks and indentation,
    /// and makes sure every heading marker is followed by a space. Runs of
    /// blank lines collapse to one. Fenced code blocks are kept verbatim apart
    /// from trailing whitespace.
    pub fn clean_content(&self, content: &str) -> String {
        let normalised = content.replace("\r\n", "\n");
        let mut in_fence = false;
        let mut blank_run = 0;
        let mut lines: Vec<String> = Vec::new();

        for line in normalised.lines() {
            let line = line.trim_end();
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                blank_run = 0;
                lines.push(line.to_string());
                continue;
            }
            if in_fence {
                lines.push(line.to_string());
                continue;
            }
            if line.is_empty() {
                blank_run += 1;
                if blank_run == 1 {
                    lines.push(String::new());
                }
                continue;
            }
            blank_run = 0;
            let (indent, text) = line.split_at(line.len() - line.trim_start().len());
            let text = self.patterns.inline_whitespace.replace_all(text, " ");
            let text = self
                .patterns
                .heading_without_space
                .replace(&text, "$1 $2");
            lines.push(format!("{indent}{text}"));
        }

        lines.join("\n").trim().to_string()
    }

    /// Reads one note and returns its chunks as documents. Empty notes yield
    /// no documents.
    pub fn read_file(&self, path: &Path) -> Result<Vec<Document>, MarkdownIngestError> {
        let raw = fs::read_to_string(path)?;
        let path_str = path.to_string_lossy().to_string();
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();

        let metadata = self.extract_metadata(&raw, &filename);
        let cleaned = self.clean_content(&raw);
        let chunks = match chunk_text(&cleaned) {
            Ok(chunks) => chunks,
            Err(ChunkError::EmptyContent) => {
                debug!("Skipping empty note {path_str}");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(MarkdownIngestError::Chunk {
                    path: path_str,
                    source,
                })
            }
        };

        let mut base = Map::new();
        base.insert("source".to_string(), Value::from(path_str.clone()));
        base.insert("filename".to_string(), Value::from(filename));
        base.insert("title".to_string(), Value::from(metadata.title));
        base.insert("headers".to_string(), Value::from(metadata.headers));
        base.insert(
            "code_block_count".to_string(),
            Value::from(metadata.code_block_count),
        );

        Ok(chunks
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                // Stable ids make re-ingesting a note overwrite its previous chunks.
                let id = Uuid::new_v5(
                    &Uuid::NAMESPACE_URL,
                    format!("{path_str}#chunk_{index}").as_bytes(),
                );
                let mut metadata = base.clone();
                metadata.insert("chunk_index".to_string(), Value::from(index));
                Document {
                    id: id.to_string(),
                    content,
                    metadata,
                }
            })
            .collect())
    }

    /// Reads every note in the folder. Files that cannot be read are logged
    /// and skipped.
    pub fn read_all(&self) -> Vec<Document> {
        let files = self.find_markdown_files();
        let mut documents = Vec::new();
        for path in &files {
            match self.read_file(path) {
                Ok(mut docs) => documents.append(&mut docs),
                Err(e) => warn!("Skipping {}: {e}", path.display()),
            }
        }
        info!(
            "Read {} documents from {} markdown files in {}",
            documents.len(),
            files.len(),
            self.folder.display()
        );
        documents
    }
}

#[async_trait]
impl DocumentReader for MarkdownFolderReader {
    fn source(&self) -> String {
        self.folder.display().to_string()
    }

    /// Fails with `SourceNotFound` when the folder does not exist.
    async fn read_documents(&self) -> Result<Vec<Document>, IngestError> {
        if !self.folder.is_dir() {
            return Err(IngestError::SourceNotFound(format!(
                "Knowledge base folder '{}' does not exist",
                self.folder.display()
            )));
        }
        Ok(self.read_all())
    }
}
