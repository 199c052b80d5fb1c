//! Post-install artifact checks.
//!
//! The only check is a size floor: a truncated download or an HTML error
//! page saved as a package comes out far smaller than any real `.vsix`.

use std::path::Path;

use crate::error::{Result, VsxmError};

/// Artifacts must be strictly larger than this many bytes.
pub const MIN_ARTIFACT_BYTES: u64 = 1000;

/// Size of the regular file at `path`, or `None` if it cannot be stat'ed.
pub async fn artifact_size(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path)
        .await
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// `true` iff `path` exists and is larger than [`MIN_ARTIFACT_BYTES`].
/// Never fails; any stat error counts as invalid.
pub async fn validate(path: &Path) -> bool {
    artifact_size(path)
        .await
        .is_some_and(|size| size > MIN_ARTIFACT_BYTES)
}

/// Like [`validate`], but reports why the artifact was rejected.
pub async fn check_artifact(path: &Path) -> Result<u64> {
    let size = artifact_size(path).await.unwrap_or(0);
    if size > MIN_ARTIFACT_BYTES {
        Ok(size)
    } else {
        tracing::warn!(path = %path.display(), size, "artifact failed size check");
        Err(VsxmError::Validation {
            path: path.to_path_buf(),
            size,
        })
    }
}
