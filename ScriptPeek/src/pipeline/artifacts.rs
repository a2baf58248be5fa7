//! Artifact output

use std::path::Path;

use crate::error::{Error, Result};

/// Write `bytes` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns [`Error::ArtifactWriteFailed`] if the directory or file cannot be
/// written.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    let failed = |source| Error::ArtifactWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(failed)?;
    }
    std::fs::write(path, bytes).map_err(failed)
}
