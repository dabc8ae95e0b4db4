use crate::domain::Tag;
use crate::error::Result;
use crate::git::CommitInfo;
use chrono::DateTime;
use git2::{Oid, Repository as Git2Repo, Sort};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Tag names grouped by the commit they point at
    fn tags_by_commit(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut tags: HashMap<Oid, Vec<String>> = HashMap::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(e) => {
                    warn!(tag = name, error = %e, "skipping unreadable tag");
                    continue;
                }
            };
            if let Ok(commit) = reference.peel_to_commit() {
                tags.entry(commit.id()).or_default().push(name.to_string());
            }
        }

        Ok(tags)
    }
}

impl super::Repository for Git2Repository {
    fn latest_tag(&self) -> Result<Option<String>> {
        let tags = self.tags_by_commit()?;
        if tags.is_empty() {
            return Ok(None);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        for oid in revwalk {
            if let Some(names) = tags.get(&oid?) {
                // Several tags on one commit: prefer the highest version
                let latest = names
                    .iter()
                    .max_by_key(|name| (Tag::new(name.as_str()).version(), (*name).clone()))
                    .cloned();
                debug!(tag = ?latest, "latest reachable tag");
                return Ok(latest);
            }
        }

        Ok(None)
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(tag) = tag {
            let boundary = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag))?
                .peel_to_commit()?;
            revwalk.hide(boundary.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let hash = commit.id().to_string().chars().take(8).collect::<String>();
            let date = DateTime::from_timestamp(commit.time().seconds(), 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();

            commits.push(CommitInfo {
                hash,
                message: commit.summary().unwrap_or("").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
                date,
            });
        }

        // Oldest first
        commits.reverse();
        debug!(count = commits.len(), since = ?tag, "collected commits");
        Ok(commits)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        debug!(tag = name, commit = %head.id(), "created annotated tag");
        Ok(())
    }
}
