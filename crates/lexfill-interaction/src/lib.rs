//! Question phrasing for lexfill sessions.
//!
//! - [`OpenAiPhraser`]: asks a chat-completions model to word each question
//! - [`TemplatePhraser`]: deterministic offline questions

pub mod error;
pub mod openai_phraser;
pub mod prompt;
pub mod template_phraser;

pub use error::PhraserError;
pub use openai_phraser::OpenAiPhraser;
pub use template_phraser::TemplatePhraser;
