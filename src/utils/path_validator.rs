use crate::error::{CheckerError, Result};
use std::path::{Path, PathBuf};

/// Resolves the directory a scan starts from.
pub struct PathValidator;

impl PathValidator {
    /// Makes `path` absolute without resolving symlinks, so reported manifest
    /// paths keep the spelling the user chose. The path must be an existing
    /// directory.
    pub fn validate_root_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let invalid = |reason: String| CheckerError::InvalidPath {
            path: path.display().to_string(),
            reason,
        };

        let absolute = std::path::absolute(path).map_err(|e| invalid(e.to_string()))?;
        let metadata = absolute.metadata().map_err(|e| invalid(e.to_string()))?;

        if !metadata.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }

        Ok(absolute)
    }
}
