//! Workflow orchestration behind each subcommand
//!
//! These functions wire git, the preparer and the UI together so `main.rs`
//! only parses arguments. They are generic over [`Repository`] and take it as
//! an `Option`: outside a git repository, workflows that do not need history
//! still run. Dry runs are decided by the [`ReleasePreparer`] passed in.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::domain::{BranchContext, SemanticVersion, VersionBump};
use crate::git::Repository;
use crate::preparer::{ChangelogRequest, ChangelogTarget, PrepareRequest, ReleasePreparer};
use crate::ui;

/// Arguments for the prepare workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareWorkflowArgs {
    /// Target version
    pub version: String,

    /// Hand-written change notes
    pub changes: Vec<String>,

    /// Collect changelog entries from commits since the last tag
    pub auto: bool,

    /// Collect commits since this tag instead of the latest one
    pub since: Option<String>,

    /// Record the release in the changelog
    pub update_changelog: bool,

    /// Create an annotated tag for the release
    pub tag: bool,

    /// Skip the pre-release consistency checks
    pub skip_validation: bool,

    /// Patch release: failed pre-release checks are reported but do not stop
    /// the release
    pub patch: bool,
}

/// Arguments for the bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    pub kind: VersionBump,
    pub tag: bool,
    /// Skip confirmation prompts
    pub yes: bool,
}

/// Arguments for the beta workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BetaWorkflowArgs {
    /// Beta iteration; the next one after the current version when `None`
    pub number: Option<u32>,
    /// Hand-written change notes
    pub changes: Vec<String>,
    pub tag: bool,
    /// Skip confirmation prompts
    pub yes: bool,
}

/// Arguments for the standalone changelog workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogWorkflowArgs {
    pub target: ChangelogTarget,
    pub auto: bool,
    pub since: Option<String>,
    /// Entries recorded under Changed
    pub add: Vec<String>,
    pub interactive: bool,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The prepared version
    pub version: SemanticVersion,

    /// The tag that was created
    pub tag: Option<String>,

    /// Files written, or that would be written on a dry run
    pub files: Vec<PathBuf>,

    pub warnings: Vec<BoundaryWarning>,
}

/// Commit subjects to build a changelog from.
///
/// Starts at `since` when given, otherwise at the latest reachable tag. Without
/// any tag nothing is collected.
pub fn collect_commit_messages<R: Repository>(
    repo: &R,
    since: Option<&str>,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<Vec<String>> {
    let since = match since {
        Some(tag) => Some(tag.to_string()),
        None => repo.latest_tag()?,
    };
    let Some(since) = since else {
        warnings.push(BoundaryWarning::NoPreviousTag);
        return Ok(Vec::new());
    };

    let commits = repo.commits_since(Some(&since))?;
    if commits.is_empty() {
        warnings.push(BoundaryWarning::NoNewCommits { since });
        return Ok(Vec::new());
    }

    ui::display_commit_analysis(&commits, Some(&since));
    Ok(commits.into_iter().map(|c| c.message).collect())
}

/// Warning when releasing from a branch not configured for releases
pub fn check_branch<R: Repository>(
    repo: &R,
    release_branches: &[String],
) -> Result<Option<BoundaryWarning>> {
    let Some(name) = repo.current_branch()? else {
        return Ok(None);
    };

    let branch = BranchContext::new(name, release_branches);
    if branch.is_release_branch() {
        Ok(None)
    } else {
        Ok(Some(BoundaryWarning::NotOnReleaseBranch {
            branch: branch.name,
        }))
    }
}

/// Main prepare workflow
///
/// 1. Run the consistency checks (unless skipped)
/// 2. Collect commits when requested
/// 3. Update version files and the changelog
/// 4. Optionally create the release tag
/// 5. Re-check consistency after writing
pub fn run_prepare_workflow<R: Repository>(
    args: PrepareWorkflowArgs,
    preparer: &ReleasePreparer,
    repo: Option<&R>,
) -> Result<WorkflowResult> {
    let mut warnings = Vec::new();

    if args.tag && repo.is_none() {
        bail!("--tag requires a git repository");
    }

    if !args.skip_validation {
        ui::display_status("Running pre-release checks...");
        let report = preparer.check_consistency()?;
        ui::display_consistency_report(&report);
        if !report.is_ok() {
            if !args.patch {
                bail!("Validation checks failed");
            }
            warnings.push(BoundaryWarning::ValidationFailed);
        }
    }

    if let Some(repo) = repo {
        warnings.extend(check_branch(repo, &preparer.config().release.release_branches)?);
    }

    let commits = if args.auto {
        let repo = repo.ok_or_else(|| anyhow!("--auto requires a git repository"))?;
        collect_commit_messages(repo, args.since.as_deref(), &mut warnings)?
    } else {
        Vec::new()
    };

    if let Ok(current) = preparer.current_version() {
        if let Ok(target) = SemanticVersion::parse(&args.version) {
            ui::display_proposed_version(&current.format(), &target.format());
        }
    }

    let report = preparer.prepare(PrepareRequest {
        version: args.version.clone(),
        commits,
        notes: args.changes.clone(),
        update_changelog: args.update_changelog,
    })?;
    warnings.extend(report.warnings.iter().cloned());

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
    if let Some(section) = &report.section {
        ui::display_section_preview(section);
    }

    let (tag, message) = preparer.config().release_tag(&report.version)?;

    if report.dry_run {
        ui::display_status("Dry run:");
        for path in &report.updated_files {
            ui::display_success(&format!("  Would update {}", path.display()));
        }
        if args.tag {
            ui::display_success(&format!("  Would create tag {}", tag.name));
        }
        return Ok(WorkflowResult {
            version: report.version,
            tag: None,
            files: report.updated_files,
            warnings,
        });
    }

    for path in &report.updated_files {
        ui::display_success(&format!("Updated {}", path.display()));
    }

    if !args.skip_validation {
        let after = preparer.check_consistency()?;
        if !after.versions_consistent() {
            ui::display_consistency_report(&after);
            bail!("Version consistency validation failed after updates");
        }
    }

    let created = if args.tag {
        let repo = repo.ok_or_else(|| anyhow!("--tag requires a git repository"))?;
        ui::display_status(&format!("Creating tag: {}", tag.name));
        repo.create_tag(&tag.name, &message)?;
        ui::display_success(&format!("Created tag: {}", tag.name));
        Some(tag.name.clone())
    } else {
        None
    };

    info!(version = %report.version, "release prepared");
    ui::display_success(&format!("Successfully prepared release {}", report.version));
    ui::display_next_steps(&tag.name, created.is_some());

    Ok(WorkflowResult {
        version: report.version,
        tag: created,
        files: report.updated_files,
        warnings,
    })
}

/// Bump the current version and prepare that release from the commits since
/// the latest tag.
///
/// # Returns
/// * `Ok(Some(result))` - The prepared release
/// * `Ok(None)` - If the user declined
pub fn run_bump_workflow<R: Repository>(
    args: BumpWorkflowArgs,
    preparer: &ReleasePreparer,
    repo: Option<&R>,
) -> Result<Option<WorkflowResult>> {
    let current = preparer.current_version()?;
    let next = current.bump(args.kind)?;
    debug!(%current, %next, kind = %args.kind, "bumping version");

    ui::display_proposed_version(&current.format(), &next.format());

    if !args.yes && !preparer.is_dry_run() && !ui::confirm_action(&format!("Prepare release {}?", next))? {
        println!("Operation cancelled by user.");
        return Ok(None);
    }

    let prepare = PrepareWorkflowArgs {
        version: next.format(),
        auto: repo.is_some(),
        update_changelog: true,
        tag: args.tag,
        ..Default::default()
    };
    run_prepare_workflow(prepare, preparer, repo).map(Some)
}

/// Prepare a beta of the current version (`X.Y.Z-beta.N`) from the given
/// notes and, inside a git repository, the commits since the latest tag.
///
/// # Returns
/// * `Ok(Some(result))` - The prepared beta
/// * `Ok(None)` - If the user declined
pub fn run_beta_workflow<R: Repository>(
    args: BetaWorkflowArgs,
    preparer: &ReleasePreparer,
    repo: Option<&R>,
) -> Result<Option<WorkflowResult>> {
    let beta = preparer.beta(args.number)?;
    debug!(%beta, "preparing beta release");

    if !args.yes && !preparer.is_dry_run() && !ui::confirm_action(&format!("Prepare beta release {}?", beta))? {
        println!("Operation cancelled by user.");
        return Ok(None);
    }

    let prepare = PrepareWorkflowArgs {
        version: beta.format(),
        changes: args.changes,
        auto: repo.is_some(),
        update_changelog: true,
        tag: args.tag,
        ..Default::default()
    };
    run_prepare_workflow(prepare, preparer, repo).map(Some)
}

/// Add a changelog section from commits, notes, or interactive input.
///
/// With neither `auto` nor `add`, entries are asked for interactively.
pub fn run_changelog_workflow<R: Repository>(
    args: ChangelogWorkflowArgs,
    preparer: &ReleasePreparer,
    repo: Option<&R>,
) -> Result<Vec<BoundaryWarning>> {
    let mut warnings = Vec::new();
    let mut request = ChangelogRequest::new(args.target.clone());

    if args.auto {
        let repo = repo.ok_or_else(|| anyhow!("--auto requires a git repository"))?;
        request.commits = collect_commit_messages(repo, args.since.as_deref(), &mut warnings)?;
    }
    request.notes = args.add.clone();

    if args.interactive || (!args.auto && args.add.is_empty()) {
        let label = match &args.target {
            ChangelogTarget::Version(version) => version.clone(),
            ChangelogTarget::Unreleased => "Unreleased".to_string(),
        };
        request.categorized = ui::prompt_category_entries(&label)?;
    }

    let report = preparer.update_changelog(request)?;
    warnings.extend(report.warnings.iter().cloned());
    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }

    if let Some(section) = &report.section {
        ui::display_section_preview(section);
        if report.written {
            ui::display_success(&format!("Updated {}", report.path.display()));
        } else {
            ui::display_status("Dry run: changelog not written");
        }
    }

    Ok(warnings)
}

/// Report version consistency, missing files and the current branch.
///
/// # Returns
/// * `Ok(true)` - If every check passed
/// * `Ok(false)` - If any check failed
pub fn run_check_workflow<R: Repository>(preparer: &ReleasePreparer, repo: Option<&R>) -> Result<bool> {
    match preparer.current_version() {
        Ok(version) => ui::display_status(&format!("Current version: {}", version)),
        Err(e) => ui::display_error(&e.to_string()),
    }

    if let Some(repo) = repo {
        if let Some(warning) = check_branch(repo, &preparer.config().release.release_branches)? {
            ui::display_boundary_warning(&warning);
        }
    }

    let report = preparer.check_consistency()?;
    ui::display_consistency_report(&report);
    Ok(report.is_ok())
}
