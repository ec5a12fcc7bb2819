//! Error types for the Lexfill application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every fallible session action.
///
/// Every variant is a synchronous result of the action that produced it.
/// Rejected actions never leave partial effects behind, so the caller can
/// re-prompt or retry after inspecting the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillError {
    /// The document-analysis collaborator could not analyze the upload.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// An answer was submitted for a placeholder that is not the active one.
    #[error("Out of order answer: expected '{expected}', received '{received}'")]
    OutOfOrderAnswer { expected: String, received: String },

    /// An action was attempted outside the state it is valid in.
    #[error("Invalid state transition: cannot {action} while {state}")]
    InvalidStateTransition { action: String, state: String },

    /// The answer contained only blank content.
    #[error("Empty answer for placeholder '{placeholder}'")]
    EmptyAnswer { placeholder: String },

    /// The phrasing collaborator could not produce the next question.
    #[error("Phrasing failed: {0}")]
    PhraseFailed(String),

    /// The rendering collaborator could not produce the filled document.
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl FillError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UploadFailed error
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::UploadFailed(message.into())
    }

    /// Creates an InvalidStateTransition error
    pub fn invalid_transition(action: impl Into<String>, state: impl ToString) -> Self {
        Self::InvalidStateTransition {
            action: action.into(),
            state: state.to_string(),
        }
    }

    /// Creates a PhraseFailed error
    pub fn phrase_failed(message: impl Into<String>) -> Self {
        Self::PhraseFailed(message.into())
    }

    /// Creates a RenderFailed error
    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::RenderFailed(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error was raised by a collaborator call.
    ///
    /// Collaborator failures leave the session untouched and may be retried
    /// as-is; the remaining variants need different input from the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UploadFailed(_) | Self::PhraseFailed(_) | Self::RenderFailed(_)
        )
    }

    /// Check if this is an OutOfOrderAnswer error
    pub fn is_out_of_order(&self) -> bool {
        matches!(self, Self::OutOfOrderAnswer { .. })
    }

    /// Check if this is an InvalidStateTransition error
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidStateTransition { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for FillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for FillError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML - {}", err))
    }
}

/// A type alias for `Result<T, FillError>`.
pub type Result<T> = std::result::Result<T, FillError>;
