//! Legal context lookup per document type.

use lexfill_core::document::DocType;
use std::path::PathBuf;

/// Context used for any document type without a file or built-in entry.
pub const GENERIC_CONTEXT: &str = "You are a helpful assistant helping fill out a legal document.";

const SAFE_CONTEXT: &str = "You are a helpful assistant helping a founder fill out a SAFE \
(Simple Agreement for Future Equity). Amounts are in US dollars, the valuation cap and \
discount rate define conversion terms, and parties are the company and the investor.";

const NDA_CONTEXT: &str = "You are a helpful assistant helping fill out a non-disclosure \
agreement. Identify the disclosing and receiving parties precisely, and ask for dates, \
durations, and governing law in unambiguous terms.";

const EMPLOYMENT_CONTEXT: &str = "You are a helpful assistant helping fill out an employment \
agreement. Names, job titles, start dates, compensation, and work location should be asked \
for with the exact wording that belongs in the contract.";

/// Looks up the legal context for a document type.
///
/// Resolution order:
/// 1. `<prompts_dir>/<doc_type>.txt`
/// 2. Built-in context for `safe`, `nda`, `employment`
/// 3. [`GENERIC_CONTEXT`]
#[derive(Debug, Clone, Default)]
pub struct PromptRegistry {
    prompts_dir: Option<PathBuf>,
}

impl PromptRegistry {
    pub fn new(prompts_dir: Option<PathBuf>) -> Self {
        Self { prompts_dir }
    }

    pub async fn legal_context(&self, doc_type: &DocType) -> String {
        if let Some(text) = self.load_file(doc_type).await {
            return text;
        }
        builtin_context(doc_type).to_string()
    }

    async fn load_file(&self, doc_type: &DocType) -> Option<String> {
        let dir = self.prompts_dir.as_ref()?;
        let name = doc_type.as_str();
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            tracing::warn!(doc_type = name, "Ignoring prompt file for unusual document type");
            return None;
        }

        let path = dir.join(format!("{}.txt", name));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read prompt file");
                None
            }
        }
    }
}

fn builtin_context(doc_type: &DocType) -> &'static str {
    match doc_type.as_str() {
        "safe" => SAFE_CONTEXT,
        "nda" => NDA_CONTEXT,
        "employment" => EMPLOYMENT_CONTEXT,
        _ => GENERIC_CONTEXT,
    }
}
