//! Release preparation: advance the declared version and the changelog
//! together.
//!
//! Every output is computed in memory first. Files are only written once all
//! of them have been staged, so a bad version string, a missing version source
//! or a duplicate changelog entry leaves the project untouched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, instrument};

use crate::boundary::BoundaryWarning;
use crate::changelog::{CategorizedEntries, ChangelogDocument, ChangelogSection};
use crate::config::ReleaseConfig;
use crate::conventional;
use crate::domain::{ChangeCategory, SemanticVersion, VersionBump};
use crate::error::{ReleasePrepError, Result};
use crate::version_files::write_atomic;

/// Inputs of a full release preparation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareRequest {
    /// Target version, `X.Y.Z` or `X.Y.Z-label.N`, optionally `v`-prefixed
    pub version: String,
    /// Commit subjects to classify into the changelog
    pub commits: Vec<String>,
    /// Hand-written change notes, classified like commits but never excluded
    pub notes: Vec<String>,
    /// Whether to add a changelog section at all
    pub update_changelog: bool,
}

/// Outcome of [`ReleasePreparer::prepare`]
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareReport {
    pub previous_version: SemanticVersion,
    pub version: SemanticVersion,
    /// Files written, or that would be written on a dry run
    pub updated_files: Vec<PathBuf>,
    /// Changelog section added, if any
    pub section: Option<ChangelogSection>,
    pub warnings: Vec<BoundaryWarning>,
    pub dry_run: bool,
}

/// Which changelog section to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogTarget {
    Version(String),
    Unreleased,
}

/// Inputs of a standalone changelog update
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogRequest {
    pub target: ChangelogTarget,
    /// Commit subjects to classify
    pub commits: Vec<String>,
    /// Notes recorded as-is under Changed
    pub notes: Vec<String>,
    /// Entries already sorted into categories, e.g. from interactive input
    pub categorized: CategorizedEntries,
}

impl ChangelogRequest {
    pub fn new(target: ChangelogTarget) -> Self {
        ChangelogRequest {
            target,
            commits: Vec::new(),
            notes: Vec::new(),
            categorized: CategorizedEntries::new(),
        }
    }
}

/// Outcome of [`ReleasePreparer::update_changelog`]
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogReport {
    /// The section as it now reads in the document; `None` when nothing was
    /// recorded
    pub section: Option<ChangelogSection>,
    pub path: PathBuf,
    pub written: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// Version declared by one configured file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReading {
    pub path: PathBuf,
    pub required: bool,
    /// `None` when the file or its version field is missing
    pub version: Option<String>,
}

/// Result of [`ReleasePreparer::check_consistency`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub readings: Vec<VersionReading>,
    /// Required project files that do not exist
    pub missing_files: Vec<PathBuf>,
}

impl ConsistencyReport {
    /// All found versions agree and every required version file declares one
    pub fn versions_consistent(&self) -> bool {
        if self
            .readings
            .iter()
            .any(|r| r.required && r.version.is_none())
        {
            return false;
        }

        let mut found = self.readings.iter().filter_map(|r| r.version.as_deref());
        match found.next() {
            Some(first) => found.all(|v| v == first),
            None => false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.versions_consistent() && self.missing_files.is_empty()
    }
}

/// Coordinates version files and the changelog of one project
#[derive(Debug, Clone)]
pub struct ReleasePreparer {
    project_root: PathBuf,
    config: ReleaseConfig,
    release_date: String,
    dry_run: bool,
}

impl ReleasePreparer {
    /// Create a preparer dated today
    pub fn new(project_root: impl Into<PathBuf>, config: ReleaseConfig) -> Self {
        ReleasePreparer {
            project_root: project_root.into(),
            config,
            release_date: Local::now().format("%Y-%m-%d").to_string(),
            dry_run: false,
        }
    }

    /// Use a fixed release date (`YYYY-MM-DD`) instead of today
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = date.into();
        self
    }

    /// Compute everything but write nothing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.project_root.join(&self.config.changelog.path)
    }

    /// Version declared by the authoritative version file
    pub fn current_version(&self) -> Result<SemanticVersion> {
        let source = self
            .config
            .version_source()
            .ok_or_else(|| ReleasePrepError::config("no version file configured"))?;
        let raw = source.read_version(&self.project_root)?;
        SemanticVersion::parse(&raw)
    }

    /// Current version bumped by `kind`
    pub fn bump(&self, kind: VersionBump) -> Result<SemanticVersion> {
        self.current_version()?.bump(kind)
    }

    /// Beta of the current version: beta `number` when given, otherwise the
    /// beta after the current one
    pub fn beta(&self, number: Option<u32>) -> Result<SemanticVersion> {
        let current = self.current_version()?;
        match number {
            Some(number) => current.with_beta(number),
            None => current.next_beta(),
        }
    }

    /// Read the changelog, starting from an empty document when the file is
    /// absent
    pub fn load_changelog(&self) -> Result<(ChangelogDocument, Option<BoundaryWarning>)> {
        let path = self.changelog_path();
        if !path.is_file() {
            let warning = BoundaryWarning::ChangelogMissing {
                path: self.config.changelog.path.clone(),
            };
            return Ok((ChangelogDocument::default(), Some(warning)));
        }
        let text = fs::read_to_string(&path)?;
        Ok((ChangelogDocument::load(&text), None))
    }

    /// Set every version file to the target version and record the release in
    /// the changelog.
    #[instrument(skip(self, request), fields(version = %request.version, dry_run = self.dry_run))]
    pub fn prepare(&self, request: PrepareRequest) -> Result<PrepareReport> {
        let target = SemanticVersion::parse(&request.version)?;
        let previous = self.current_version()?;
        let label = target.format();
        let mut warnings = Vec::new();

        if target <= previous {
            warnings.push(BoundaryWarning::VersionNotAdvancing {
                current: previous.format(),
                target: label.clone(),
            });
        }

        let mut staged: Vec<(PathBuf, String)> = Vec::new();
        for file in &self.config.version_files {
            match file.staged_update(&self.project_root, &label) {
                Ok(content) => staged.push((file.resolve(&self.project_root), content)),
                Err(ReleasePrepError::MissingVersionSource { path, reason }) if !file.required => {
                    warnings.push(BoundaryWarning::VersionFileSkipped { path, reason });
                }
                Err(e) => return Err(e),
            }
        }

        let mut section = None;
        if request.update_changelog {
            let (document, missing) = self.load_changelog()?;
            warnings.extend(missing);

            if document.contains_version(&label) {
                return Err(ReleasePrepError::DuplicateRelease(label));
            }

            let commits = conventional::categorize_commits(&request.commits);
            let notes = conventional::categorize_notes(&request.notes);
            let built = ChangelogSection::build(
                label.clone(),
                self.release_date.clone(),
                commits.into_iter().chain(notes),
            );

            if built.is_empty() {
                warnings.push(BoundaryWarning::NoChangelogEntries {
                    version: label.clone(),
                });
            } else {
                let document = document.insert(built.clone());
                staged.push((self.changelog_path(), document.render()));
                section = Some(built);
            }
        }

        for warning in &warnings {
            debug!(%warning, "boundary condition");
        }

        let updated_files = self.commit_staged(staged)?;
        info!(
            from = %previous,
            to = %target,
            files = updated_files.len(),
            "release prepared"
        );

        Ok(PrepareReport {
            previous_version: previous,
            version: target,
            updated_files,
            section,
            warnings,
            dry_run: self.dry_run,
        })
    }

    /// Add a versioned or Unreleased section to the changelog without touching
    /// version files.
    #[instrument(skip(self, request), fields(target = ?request.target, dry_run = self.dry_run))]
    pub fn update_changelog(&self, request: ChangelogRequest) -> Result<ChangelogReport> {
        let (document, missing) = self.load_changelog()?;
        let mut warnings: Vec<BoundaryWarning> = missing.into_iter().collect();

        let mut entries: Vec<(ChangeCategory, Vec<String>)> = Vec::new();
        entries.extend(conventional::categorize_commits(&request.commits));
        if !request.notes.is_empty() {
            entries.push((ChangeCategory::Changed, request.notes.clone()));
        }
        entries.extend(request.categorized);

        let (label, section) = match &request.target {
            ChangelogTarget::Version(raw) => {
                let label = SemanticVersion::parse(raw)?.format();
                if document.contains_version(&label) {
                    return Err(ReleasePrepError::DuplicateRelease(label));
                }
                let section =
                    ChangelogSection::build(label.clone(), self.release_date.clone(), entries);
                (label, section)
            }
            ChangelogTarget::Unreleased => {
                let section = ChangelogSection::unreleased(entries);
                (section.version_label().to_string(), section)
            }
        };

        let path = self.changelog_path();
        if section.is_empty() {
            warnings.push(BoundaryWarning::NoChangelogEntries { version: label });
            for warning in &warnings {
                debug!(%warning, "boundary condition");
            }
            return Ok(ChangelogReport {
                section: None,
                path,
                written: false,
                warnings,
            });
        }

        for warning in &warnings {
            debug!(%warning, "boundary condition");
        }

        let document = document.insert(section);
        let merged = document.find(&label).cloned();
        self.commit_staged(vec![(path.clone(), document.render())])?;
        let written = !self.dry_run;
        debug!(label = %label, written, "changelog updated");

        Ok(ChangelogReport {
            section: merged,
            path,
            written,
            warnings,
        })
    }

    /// Compare the version declared by every configured file and look for
    /// missing required project files.
    pub fn check_consistency(&self) -> Result<ConsistencyReport> {
        let mut readings = Vec::new();
        for file in &self.config.version_files {
            let version = match file.read_version(&self.project_root) {
                Ok(version) => Some(version),
                Err(ReleasePrepError::MissingVersionSource { reason, .. }) => {
                    debug!(path = %file.path.display(), reason = %reason, "no version found");
                    None
                }
                Err(e) => return Err(e),
            };
            readings.push(VersionReading {
                path: file.path.clone(),
                required: file.required,
                version,
            });
        }

        let missing_files = self
            .config
            .release
            .required_files
            .iter()
            .filter(|path| !self.project_root.join(path).exists())
            .cloned()
            .collect();

        Ok(ConsistencyReport {
            readings,
            missing_files,
        })
    }

    /// Write staged contents unless this is a dry run. Returns the affected
    /// paths either way.
    fn commit_staged(&self, staged: Vec<(PathBuf, String)>) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(staged.len());
        for (path, content) in staged {
            if self.dry_run {
                debug!(path = %path.display(), "dry run, not writing");
            } else {
                write_atomic(&path, &content)?;
                debug!(path = %path.display(), "written");
            }
            paths.push(path);
        }
        Ok(paths)
    }
}
