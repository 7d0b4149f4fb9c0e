//! Store round-trip utilities.
//!
//! Every operation against the collection is bounded by the configured timeout and
//! writes replace documents via a temporary sibling file, so a reader never sees a
//! half-written document.

use crate::{StoreError, StoreResult};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runs one store round trip, failing with [`StoreError::Timeout`] once `timeout` elapses.
pub(crate) async fn round_trip<T, F>(
    operation: &'static str,
    timeout: Duration,
    work: F,
) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(timeout, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("store {operation} timed out after {timeout:?}");
            Err(StoreError::Timeout { operation, timeout })
        }
    }
}

/// Path of the temporary file used while replacing `path`.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Writes `contents` to `path` by writing a sibling temporary file and renaming it.
pub(crate) async fn write_replacing(path: &Path, contents: &str) -> std::io::Result<()> {
    let staged = staging_path(path);
    tokio::fs::write(&staged, contents).await?;
    if let Err(e) = tokio::fs::rename(&staged, path).await {
        // Best effort: leave no stray staging file behind.
        let _ = tokio::fs::remove_file(&staged).await;
        return Err(e);
    }
    Ok(())
}
