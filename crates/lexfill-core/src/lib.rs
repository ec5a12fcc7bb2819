pub mod config;
pub mod document;
pub mod error;
pub mod phrasing;
pub mod placeholder;
pub mod session;

// Re-export common error type
pub use error::{FillError, Result};
