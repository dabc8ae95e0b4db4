//! Git access for release preparation
//!
//! The changelog engine only needs commit messages; this module is the
//! boundary that produces them. The [Repository] trait is implemented by
//!
//! - [repository::Git2Repository]: a real repository opened with `git2`
//! - [mock::MockRepository]: an in-memory history for tests
//!
//! ```rust
//! # use release_prep::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_prep::Result<()> {
//! let since = repo.latest_tag()?;
//! let commits = repo.commits_since(since.as_deref())?;
//! let messages: Vec<String> = commits.into_iter().map(|c| c.message).collect();
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Commit information as collected from history
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// Abbreviated commit hash
    pub hash: String,
    /// Commit subject line
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit date, `YYYY-MM-DD`
    pub date: String,
}

impl CommitInfo {
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        CommitInfo {
            hash: hash.into(),
            message: message.into(),
            author: author.into(),
            date: date.into(),
        }
    }
}

/// Version-control operations needed to prepare a release
pub trait Repository {
    /// Most recent tag reachable from HEAD
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The nearest tag name
    /// * `Ok(None)` - If no tag is reachable
    /// * `Err` - On git errors
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Commits reachable from HEAD but not from `tag`, oldest first.
    /// With `None`, the whole history is returned.
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Name of the checked-out branch, `None` when HEAD is detached or unborn
    fn current_branch(&self) -> Result<Option<String>>;

    /// Create an annotated tag on HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;
}
