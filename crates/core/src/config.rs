//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in this crate reads environment variables while handling a request; the
//! binaries read them and hand the raw values to [`CoreConfig::from_env_values`].

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_STORE_TIMEOUT_SECS, MAX_STORE_TIMEOUT_SECS, REPORTS_DIR_NAME,
    STUDENTS_DIR_NAME,
};
use crate::{GradebookError, GradebookResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    reports_dir: PathBuf,
    store_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// When `reports_dir` is `None` reports are saved under `<data_dir>/reports`.
    ///
    /// # Errors
    ///
    /// Returns [`GradebookError::Config`] if `store_timeout` is zero or longer than
    /// [`MAX_STORE_TIMEOUT_SECS`].
    pub fn new(
        data_dir: PathBuf,
        reports_dir: Option<PathBuf>,
        store_timeout: Duration,
    ) -> GradebookResult<Self> {
        if store_timeout.is_zero() || store_timeout > Duration::from_secs(MAX_STORE_TIMEOUT_SECS)
        {
            return Err(GradebookError::Config(format!(
                "store timeout must be between 1 and {MAX_STORE_TIMEOUT_SECS} seconds"
            )));
        }

        let reports_dir = reports_dir.unwrap_or_else(|| data_dir.join(REPORTS_DIR_NAME));

        Ok(Self {
            data_dir,
            reports_dir,
            store_timeout,
        })
    }

    /// Build a configuration from raw environment values.
    ///
    /// Each argument is the value of the matching variable, if set. Empty or
    /// whitespace-only values count as unset.
    pub fn from_env_values(
        data_dir: Option<String>,
        reports_dir: Option<String>,
        store_timeout_secs: Option<String>,
    ) -> GradebookResult<Self> {
        let data_dir = non_blank(data_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let reports_dir = non_blank(reports_dir).map(PathBuf::from);
        let store_timeout = store_timeout_from_env_value(store_timeout_secs)?;

        Self::new(data_dir, reports_dir, store_timeout)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding one document per student.
    pub fn students_dir(&self) -> PathBuf {
        self.data_dir.join(STUDENTS_DIR_NAME)
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}

/// Parse the store timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or blank, returns the default of
/// [`DEFAULT_STORE_TIMEOUT_SECS`].
pub fn store_timeout_from_env_value(value: Option<String>) -> GradebookResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS));
    };

    let secs = value.parse::<u64>().map_err(|_| {
        GradebookError::Config(format!(
            "store timeout '{value}' is not a whole number of seconds"
        ))
    })?;

    Ok(Duration::from_secs(secs))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = CoreConfig::from_env_values(None, None, None).expect("default config");
        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert_eq!(
            cfg.reports_dir(),
            Path::new(DEFAULT_DATA_DIR).join(REPORTS_DIR_NAME)
        );
        assert_eq!(
            cfg.students_dir(),
            Path::new(DEFAULT_DATA_DIR).join(STUDENTS_DIR_NAME)
        );
        assert_eq!(cfg.store_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = CoreConfig::from_env_values(Some("  ".into()), Some("".into()), Some(" ".into()))
            .expect("blank values fall back to defaults");
        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert_eq!(cfg.store_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = CoreConfig::from_env_values(
            Some("/srv/grades".into()),
            Some("/srv/out".into()),
            Some("25".into()),
        )
        .expect("explicit config");
        assert_eq!(cfg.data_dir(), Path::new("/srv/grades"));
        assert_eq!(cfg.reports_dir(), Path::new("/srv/out"));
        assert_eq!(cfg.store_timeout(), Duration::from_secs(25));
    }

    #[test]
    fn rejects_unparseable_timeout() {
        let err = store_timeout_from_env_value(Some("soon".into())).expect_err("not a number");
        assert!(matches!(err, GradebookError::Config(_)));
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let err = CoreConfig::from_env_values(None, None, Some("0".into()))
            .expect_err("zero timeout");
        assert!(matches!(err, GradebookError::Config(_)));

        let err = CoreConfig::new(PathBuf::from("x"), None, Duration::from_secs(301))
            .expect_err("timeout too long");
        assert!(matches!(err, GradebookError::Config(_)));
    }
}
