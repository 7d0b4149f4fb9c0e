//! Saving rendered reports.
//!
//! Reports are written into a single configured directory. Callers choose the file
//! name, which is validated by [`normalise_report_filename`] so writes stay inside
//! the directory. Existing files with the same name are overwritten.

use crate::validation::normalise_report_filename;
use crate::{GradebookError, GradebookResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes report text under a reports directory.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    reports_dir: PathBuf,
}

impl ReportFiles {
    /// Creates a writer for `reports_dir`. The directory is created on first write.
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Writes `contents` to `<reports_dir>/<filename>` and returns the full path.
    ///
    /// # Errors
    ///
    /// Returns `GradebookError::InvalidInput` for an unusable filename, or
    /// `GradebookError::ReportWrite` if the directory or file cannot be written.
    pub fn write(&self, filename: &str, contents: &str) -> GradebookResult<PathBuf> {
        let filename = normalise_report_filename(filename)?;

        fs::create_dir_all(&self.reports_dir).map_err(|source| GradebookError::ReportWrite {
            path: self.reports_dir.clone(),
            source,
        })?;

        let path = self.reports_dir.join(filename);
        fs::write(&path, contents).map_err(|source| GradebookError::ReportWrite {
            path: path.clone(),
            source,
        })?;

        tracing::info!("saved report to {}", path.display());
        Ok(path)
    }
}
