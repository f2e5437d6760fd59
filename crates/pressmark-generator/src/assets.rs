//! Static asset copying.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use pressmark_core::SourceKind;
use thiserror::Error;
use tracing::debug;

/// Asset copy errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The path is absolute or escapes the source root.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Copies allow-listed static files byte-for-byte into the target tree.
#[derive(Debug, Clone)]
pub struct AssetCopier {
    extensions: Vec<String>,
}

impl AssetCopier {
    /// Create a copier for the given extensions (without leading dots).
    #[must_use]
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Whether `path` has an allow-listed extension and is not hidden.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        SourceKind::classify(path, &self.extensions) == SourceKind::Asset
    }

    /// Copy `relative` from `source_root` to the same place under `target_root`.
    ///
    /// Returns `Ok(None)` for files that are not assets.
    pub fn copy(
        &self,
        source_root: &Path,
        target_root: &Path,
        relative: &Path,
    ) -> Result<Option<PathBuf>> {
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AssetError::InvalidPath(relative.to_path_buf()));
        }

        if !self.accepts(relative) {
            return Ok(None);
        }

        let dest = target_root.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source_root.join(relative), &dest)?;

        debug!(path = %relative.display(), "copied asset");
        Ok(Some(dest))
    }
}
