//! Unified path management for lexfill files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for lexfill.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/lexfill/           # Config directory (dirs::config_dir)
/// ├── config.toml              # Application configuration
/// └── prompts/                 # Default legal contexts, one <doc_type>.txt each
///
/// $TMPDIR/                     # Default upload directory
/// ├── <id>.tmpl                # Converted templates (extension header line)
/// └── <id>_filled.<ext>        # Rendered documents
/// ```
pub struct LexfillPaths;

impl LexfillPaths {
    const APP_NAME: &'static str = "lexfill";

    /// Returns the lexfill configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/lexfill/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default prompts directory.
    pub fn prompts_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("prompts"))
    }

    /// Returns the default upload directory (the system temp directory).
    pub fn upload_dir() -> PathBuf {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        if let (Ok(dir), Ok(file)) = (LexfillPaths::config_dir(), LexfillPaths::config_file()) {
            assert!(dir.ends_with("lexfill"));
            assert_eq!(file.parent(), Some(dir.as_path()));
            assert_eq!(file.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        }
    }

    #[test]
    fn test_prompts_dir_under_config_dir() {
        if let (Ok(dir), Ok(prompts)) = (LexfillPaths::config_dir(), LexfillPaths::prompts_dir()) {
            assert_eq!(prompts, dir.join("prompts"));
        }
    }
}
