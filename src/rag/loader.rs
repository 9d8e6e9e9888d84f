//! Loads source documents for the vector store.
use std::fs;
use std::path::Path;

use anyhow::{Context, Error, Result};
use htmd::HtmlToMarkdown;
use serde::{Deserialize, Serialize};

pub const DOCUMENT_EXTENSION: &str = "html";

/// Text from a single source file, or a piece of one after splitting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// File name the text was read from
    pub source: String,
    pub text: String,
}

/// Strips markup, keeping the readable text as markdown.
pub fn html_to_text(html: &str) -> Result<String, Error> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "footer", "img", "svg"])
        .build();
    let text = converter.convert(html)?;
    Ok(text)
}

/// Reads every `*.html` file in `dir` sorted by file name. Any file
/// that can't be read fails the whole load.
pub fn load_html_documents(dir: &Path) -> Result<Vec<Document>, Error> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read document directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| {
        p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION)
    });
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let html = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read document {}", path.display()))?;
        let text = html_to_text(&html)
            .with_context(|| format!("Failed to convert document {}", path.display()))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::debug!("Loaded {} ({} chars)", source, text.chars().count());
        documents.push(Document { source, text });
    }

    Ok(documents)
}
