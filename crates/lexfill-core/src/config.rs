//! Configuration model for lexfill.
//!
//! The file lives at `<config_dir>/lexfill/config.toml`; every field is
//! optional and falls back to the defaults below.

use crate::document::DEFAULT_DOC_TYPE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// Default chat model used by the OpenAI phraser.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Which phrasing collaborator to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PhraserKind {
    /// Chat-completions API, falls back to `Template` without an API key.
    #[default]
    OpenAi,
    /// Deterministic offline questions.
    Template,
}

/// `[phraser]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraserConfig {
    pub kind: PhraserKind,
    pub model: String,
    pub temperature: f32,
    /// Overridden by `OPENAI_API_KEY` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PhraserConfig {
    fn default() -> Self {
        Self {
            kind: PhraserKind::default(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.0,
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl PhraserConfig {
    /// Returns the API key if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexfillConfig {
    /// Where converted templates and filled documents are written.
    /// `None` means the system temp directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,
    /// Directory holding `<doc_type>.txt` legal context files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts_dir: Option<PathBuf>,
    pub default_doc_type: String,
    pub phraser: PhraserConfig,
}

impl Default for LexfillConfig {
    fn default() -> Self {
        Self {
            upload_dir: None,
            prompts_dir: None,
            default_doc_type: DEFAULT_DOC_TYPE.to_string(),
            phraser: PhraserConfig::default(),
        }
    }
}
