//! On-disk storage for converted templates and filled documents.

use lexfill_core::document::SessionId;
use lexfill_core::error::Result;
use std::path::{Path, PathBuf};

const TEMPLATE_SUFFIX: &str = ".tmpl";

/// A converted template read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTemplate {
    /// Extension of the original upload (e.g. `txt`, `md`).
    pub extension: String,
    /// Template source in minijinja syntax.
    pub source: String,
}

/// Directory-backed store keyed by session id.
///
/// # Layout
///
/// ```text
/// <dir>/
/// ├── <id>.tmpl             # "<ext>\n" header line, then the converted template
/// └── <id>_filled.<ext>     # last rendered output
/// ```
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves a converted template, creating the directory if needed.
    ///
    /// # Returns
    ///
    /// Path of the written template file.
    pub async fn save_template(&self, id: &SessionId, extension: &str, source: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.template_path(id);
        tokio::fs::write(&path, format!("{}\n{}", extension, source)).await?;
        tracing::debug!(session_id = %id, path = %path.display(), "Stored template");
        Ok(path)
    }

    /// Loads the template stored for `id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(template))`: The template was found
    /// - `Ok(None)`: Nothing is stored under `id` (or `id` is not a plain file stem)
    /// - `Err(FillError::Io)`: The file could not be read or has no extension header
    pub async fn load_template(&self, id: &SessionId) -> Result<Option<StoredTemplate>> {
        if !is_plain_id(id.as_str()) {
            return Ok(None);
        }

        let path = self.template_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let Some((extension, source)) = content
            .split_once('\n')
            .filter(|(ext, _)| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} has no extension header", path.display()),
            )
            .into());
        };

        Ok(Some(StoredTemplate {
            extension: extension.to_string(),
            source: source.to_string(),
        }))
    }

    fn template_path(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}{}", id, TEMPLATE_SUFFIX))
    }

    /// Writes a rendered document next to its template.
    pub async fn write_filled(&self, id: &SessionId, extension: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.filled_path(id, extension);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub fn filled_path(&self, id: &SessionId, extension: &str) -> PathBuf {
        self.dir.join(format!("{}_filled.{}", id, extension))
    }
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexfill_core::error::FillError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load_template() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());
        let id = SessionId::new("abc-123");

        let path = store.save_template(&id, "md", "Hello {{ name }}\n").await.unwrap();
        assert!(path.ends_with("abc-123.tmpl"));

        let loaded = store.load_template(&id).await.unwrap().unwrap();
        assert_eq!(loaded.extension, "md");
        assert_eq!(loaded.source, "Hello {{ name }}\n");
    }

    #[tokio::test]
    async fn test_load_reads_only_its_own_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());
        let id = SessionId::new("abc");
        store.save_template(&id, "txt", "first line\nsecond").await.unwrap();
        std::fs::write(temp_dir.path().join("abc.md.tmpl"), "stale").unwrap();
        std::fs::write(temp_dir.path().join("unrelated.bin"), [0xffu8, 0xfe]).unwrap();

        let loaded = store.load_template(&id).await.unwrap().unwrap();

        assert_eq!(loaded.extension, "txt");
        assert_eq!(loaded.source, "first line\nsecond");
    }

    #[tokio::test]
    async fn test_template_without_header_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("abc.tmpl"), "no header").unwrap();

        let err = store.load_template(&SessionId::new("abc")).await.unwrap_err();

        assert!(matches!(err, FillError::Io { .. }));
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());
        store
            .save_template(&SessionId::new("abc"), "txt", "x")
            .await
            .unwrap();

        assert_eq!(store.load_template(&SessionId::new("ab")).await.unwrap(), None);
        assert_eq!(store.load_template(&SessionId::new("zzz")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_path_like_ids_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());

        assert_eq!(store.load_template(&SessionId::new("../etc")).await.unwrap(), None);
        assert_eq!(store.load_template(&SessionId::new("")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_directory_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path().join("not-created"));

        assert_eq!(store.load_template(&SessionId::new("abc")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_filled() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());
        let id = SessionId::new("abc");

        let path = store.write_filled(&id, "txt", b"done").await.unwrap();

        assert_eq!(path, temp_dir.path().join("abc_filled.txt"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"done");
    }
}
