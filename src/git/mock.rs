use crate::error::{ReleasePrepError, Result};
use crate::git::{CommitInfo, Repository};
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// History is linear: commits are stored oldest first and a tag marks the
/// index of the commit it points at.
pub struct MockRepository {
    commits: Vec<CommitInfo>,
    tags: HashMap<String, usize>,
    branch: Option<String>,
    created_tags: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: HashMap::new(),
            branch: Some("main".to_string()),
            created_tags: RefCell::new(Vec::new()),
        }
    }

    /// Append a commit with the given subject
    pub fn add_commit(&mut self, message: impl Into<String>) {
        let index = self.commits.len();
        self.commits.push(CommitInfo::new(
            format!("{:08x}", index + 1),
            message,
            "Test Author",
            "2024-01-01",
        ));
    }

    /// Tag the most recent commit
    pub fn tag_head(&mut self, name: impl Into<String>) {
        let head = self.commits.len().saturating_sub(1);
        self.tags.insert(name.into(), head);
    }

    /// Set the checked-out branch (`None` for a detached HEAD)
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(str::to_string);
    }

    /// Tags created through [`Repository::create_tag`], with their messages
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created_tags.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self
            .tags
            .iter()
            .max_by_key(|(name, index)| (**index, (*name).clone()))
            .map(|(name, _)| name.clone()))
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let start = match tag {
            Some(tag) => {
                let index = self.tags.get(tag).ok_or_else(|| {
                    ReleasePrepError::config(format!("Tag not found: {}", tag))
                })?;
                index + 1
            }
            None => 0,
        };
        Ok(self.commits.iter().skip(start).cloned().collect())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.created_tags
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}
