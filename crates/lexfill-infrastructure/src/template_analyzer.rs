//! Bracket placeholder extraction and template conversion.
//!
//! Templates are plain UTF-8 text. A placeholder is a bracketed span such as
//! `[Investor Name]`, optionally preceded by `$` as in `$[_____]`. Its key is
//! the trimmed inner text with spaces replaced by underscores. A leading `$`
//! is literal text and stays in the rendered document.

use crate::upload_store::UploadStore;
use async_trait::async_trait;
use lexfill_core::document::{AnalyzedDocument, DocType, DocumentAnalyzer, SessionId};
use lexfill_core::error::{FillError, Result};
use lexfill_core::placeholder::{Placeholder, PlaceholderSequence};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Extension assumed when the upload name has none.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Name of the map holding the answers in the converted template.
pub const ANSWERS_VAR: &str = "answers";

// The `$` of `$[_____]` is outside the span, so it survives conversion.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("placeholder pattern is valid"));

/// Returns the placeholder for the inner text of a bracketed span, or
/// `None` when the span is blank.
pub fn placeholder_key(inner: &str) -> Option<Placeholder> {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Placeholder::new(trimmed.replace(' ', "_")))
    }
}

/// Extracts placeholders in template order, first occurrence wins.
pub fn extract_placeholders(text: &str) -> PlaceholderSequence {
    PlaceholderSequence::new(
        PLACEHOLDER_RE
            .captures_iter(text)
            .filter_map(|caps| placeholder_key(&caps[1])),
    )
}

/// Converts bracket spans into minijinja lookups of `answers["<key>"]`.
///
/// Literal text is escaped so that any `{{`, `{%` or `{#` it contains is
/// reproduced verbatim when rendered.
pub fn convert_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let (Some(span), Some(key)) = (caps.get(0), placeholder_key(&caps[1])) else {
            continue;
        };
        escape_literal(&text[last..span.start()], &mut out);
        out.push_str("{{ ");
        out.push_str(ANSWERS_VAR);
        out.push('[');
        out.push_str(&string_literal(key.as_str()));
        out.push_str("] }}");
        last = span.end();
    }
    escape_literal(&text[last..], &mut out);
    out
}

fn escape_literal(chunk: &str, out: &mut String) {
    let mut chars = chunk.chars().peekable();
    while let Some(c) = chars.next() {
        // A trailing brace could merge with the expression that follows.
        let opens_tag = c == '{' && matches!(chars.peek(), None | Some('{' | '%' | '#'));
        if opens_tag {
            out.push_str("{{ \"{\" }}");
        } else {
            out.push(c);
        }
    }
}

fn string_literal(key: &str) -> String {
    serde_json::Value::String(key.to_string()).to_string()
}

/// Lowercased extension of `file_name`, or [`DEFAULT_EXTENSION`].
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// `DocumentAnalyzer` for bracket-placeholder text templates.
///
/// Each upload is converted and stored in the [`UploadStore`] under a
/// fresh session id.
#[derive(Debug, Clone)]
pub struct TemplateAnalyzer {
    store: UploadStore,
}

impl TemplateAnalyzer {
    pub fn new(store: UploadStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DocumentAnalyzer for TemplateAnalyzer {
    async fn analyze(&self, bytes: &[u8], file_name: &str, doc_type: &DocType) -> Result<AnalyzedDocument> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| FillError::upload_failed(format!("{} is not UTF-8 text: {}", file_name, e)))?;

        let placeholders = extract_placeholders(text);
        let source = convert_template(text);
        let extension = extension_of(file_name);
        let session_id = SessionId::generate();

        self.store
            .save_template(&session_id, &extension, &source)
            .await
            .map_err(|e| FillError::upload_failed(format!("Failed to store {}: {}", file_name, e)))?;

        tracing::info!(
            session_id = %session_id,
            file_name,
            doc_type = %doc_type,
            placeholders = placeholders.len(),
            "Template analyzed"
        );

        Ok(AnalyzedDocument {
            session_id,
            placeholders,
        })
    }
}
