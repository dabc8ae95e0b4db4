use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the user but never abort the operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No changelog on disk; a fresh document with the default preamble is used
    ChangelogMissing { path: PathBuf },
    /// An optional version file is absent or has no version field
    VersionFileSkipped { path: PathBuf, reason: String },
    /// The repository has no tag to collect commits from
    NoPreviousTag,
    /// No commits since the reference tag
    NoNewCommits { since: String },
    /// Nothing left to write into the changelog after filtering
    NoChangelogEntries { version: String },
    /// Releasing from a branch not listed as a release branch
    NotOnReleaseBranch { branch: String },
    /// The target version does not move past the current one
    VersionNotAdvancing { current: String, target: String },
    /// Pre-release checks failed but the release continues in patch mode
    ValidationFailed,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ChangelogMissing { path } => {
                write!(f, "{} not found, starting a new changelog", path.display())
            }
            BoundaryWarning::VersionFileSkipped { path, reason } => {
                write!(f, "Skipping {}: {}", path.display(), reason)
            }
            BoundaryWarning::NoPreviousTag => {
                write!(f, "No previous tag found, cannot collect commits")
            }
            BoundaryWarning::NoNewCommits { since } => {
                write!(f, "No new commits since '{}'", since)
            }
            BoundaryWarning::NoChangelogEntries { version } => {
                write!(f, "No changes to record in the changelog for {}", version)
            }
            BoundaryWarning::NotOnReleaseBranch { branch } => {
                write!(f, "Not on a release branch (current: {})", branch)
            }
            BoundaryWarning::VersionNotAdvancing { current, target } => {
                write!(
                    f,
                    "Target version {} is not newer than current version {}",
                    target, current
                )
            }
            BoundaryWarning::ValidationFailed => {
                write!(f, "Pre-release checks failed, continuing in patch mode")
            }
        }
    }
}
