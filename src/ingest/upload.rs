use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reduce a client-supplied file name to a safe, flat ASCII name
///
/// Path separators become underscores, anything outside `[A-Za-z0-9._-]` is
/// dropped, and leading dots/underscores are stripped so the result can never
/// escape the upload directory or be hidden. Returns `None` when nothing usable
/// is left.
pub fn secure_filename(name: &str) -> Option<String> {
    let flattened: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = flattened.trim_start_matches(['.', '_']).trim_end_matches('.');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Saves accepted uploads under a fixed directory
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

    /// Write the upload, creating the directory on first use
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved uploaded dataset");
        Ok(path)
    }
}
