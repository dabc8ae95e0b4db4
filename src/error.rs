use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-prep operations
#[derive(Error, Debug)]
pub enum ReleasePrepError {
    #[error("Invalid version format: '{0}' - expected X.Y.Z or X.Y.Z-type.N")]
    InvalidVersionFormat(String),

    #[error("Version {0} cannot be bumped further")]
    VersionOverflow(String),

    #[error("Missing version source {}: {reason}", path.display())]
    MissingVersionSource { path: PathBuf, reason: String },

    #[error("Changelog already contains a section for version {0}")]
    DuplicateRelease(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-prep
pub type Result<T> = std::result::Result<T, ReleasePrepError>;

impl ReleasePrepError {
    /// Create an invalid version error for the offending input
    pub fn invalid_version(raw: impl Into<String>) -> Self {
        ReleasePrepError::InvalidVersionFormat(raw.into())
    }

    /// Create a missing version source error with context
    pub fn missing_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReleasePrepError::MissingVersionSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleasePrepError::Config(msg.into())
    }

    /// Returns true for errors raised before any file was touched
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ReleasePrepError::InvalidVersionFormat(_)
                | ReleasePrepError::VersionOverflow(_)
                | ReleasePrepError::MissingVersionSource { .. }
                | ReleasePrepError::DuplicateRelease(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display() {
        let err = ReleasePrepError::invalid_version("1.0");
        assert_eq!(
            err.to_string(),
            "Invalid version format: '1.0' - expected X.Y.Z or X.Y.Z-type.N"
        );
    }

    #[test]
    fn test_missing_source_names_file() {
        let err = ReleasePrepError::missing_source("pkg/_version.py", "file not found");
        let msg = err.to_string();
        assert!(msg.contains("pkg/_version.py"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleasePrepError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_validation_errors() {
        assert!(ReleasePrepError::invalid_version("abc").is_validation_error());
        assert!(ReleasePrepError::missing_source("x", "y").is_validation_error());
        assert!(ReleasePrepError::DuplicateRelease("1.0.0".into()).is_validation_error());
        assert!(!ReleasePrepError::config("bad").is_validation_error());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleasePrepError::config("x"), "Configuration error"),
            (ReleasePrepError::invalid_version("x"), "Invalid version format"),
            (
                ReleasePrepError::DuplicateRelease("1.0.0".into()),
                "Changelog already contains",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
