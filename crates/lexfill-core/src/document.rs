//! Document collaborators.
//!
//! Defines the interfaces the session controller uses to analyze an uploaded
//! template and to render the filled document, decoupling the state machine
//! from any file format or storage location.

use crate::error::Result;
use crate::placeholder::PlaceholderSequence;
use crate::session::AnswerSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Document type used when none is chosen.
pub const DEFAULT_DOC_TYPE: &str = "generic";

/// Identifier issued for an uploaded document; doubles as the session id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Issues a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label selecting the phrasing context for a document (e.g. `safe`, `nda`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocType(String);

impl DocType {
    /// Normalizes the label to trimmed lowercase; blank becomes the default.
    pub fn new(label: impl AsRef<str>) -> Self {
        let label = label.as_ref().trim().to_lowercase();
        if label.is_empty() {
            Self::default()
        } else {
            Self(label)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocType {
    fn default() -> Self {
        Self(DEFAULT_DOC_TYPE.to_string())
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Result of analyzing an uploaded template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedDocument {
    /// Identifier issued for the upload.
    pub session_id: SessionId,
    /// Placeholders in template order.
    pub placeholders: PlaceholderSequence,
}

/// A filled document ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Suggested download name (e.g. `filled.txt`).
    pub file_name: String,
    /// Document contents.
    pub bytes: Vec<u8>,
}

/// Extracts the ordered placeholder list from an uploaded template.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyzes `bytes` and issues a session id for the upload.
    ///
    /// # Errors
    ///
    /// Any error is surfaced to the caller as `FillError::UploadFailed`.
    async fn analyze(&self, bytes: &[u8], file_name: &str, doc_type: &DocType) -> Result<AnalyzedDocument>;
}

/// Produces the filled document for a completed session.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders the template uploaded as `session_id` with `answers`.
    ///
    /// # Errors
    ///
    /// Any error is surfaced to the caller as `FillError::RenderFailed`.
    async fn render(&self, session_id: &SessionId, answers: &AnswerSnapshot) -> Result<RenderedDocument>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_normalizes() {
        assert_eq!(DocType::new("  SAFE ").as_str(), "safe");
        assert_eq!(DocType::new("   ").as_str(), DEFAULT_DOC_TYPE);
    }

    #[test]
    fn test_generated_session_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
