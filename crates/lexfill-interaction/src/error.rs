//! Errors raised while phrasing a question.

use lexfill_core::error::FillError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhraserError {
    /// The API answered with a non-success status.
    #[error("OpenAI API error ({status_code}): {message}")]
    Http {
        status_code: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The request never got a response.
    #[error("OpenAI API request failed: {message}")]
    Request { message: String, is_retryable: bool },

    /// The response could not be used.
    #[error("Invalid OpenAI response: {0}")]
    InvalidResponse(String),

    /// The prompt template failed to render.
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl PhraserError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { is_retryable, .. } | Self::Request { is_retryable, .. } => *is_retryable,
            Self::InvalidResponse(_) | Self::Prompt(_) => false,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<PhraserError> for FillError {
    fn from(err: PhraserError) -> Self {
        FillError::phrase_failed(err.to_string())
    }
}

impl From<minijinja::Error> for PhraserError {
    fn from(err: minijinja::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}
