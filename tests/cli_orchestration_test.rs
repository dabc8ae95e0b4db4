use std::fs;

use release_prep::boundary::BoundaryWarning;
use release_prep::cli::orchestration::{
    run_beta_workflow, run_bump_workflow, run_changelog_workflow, run_check_workflow,
    run_prepare_workflow, BetaWorkflowArgs, BumpWorkflowArgs, ChangelogWorkflowArgs,
    PrepareWorkflowArgs,
};
use release_prep::config::ReleaseConfig;
use release_prep::domain::VersionBump;
use release_prep::git::MockRepository;
use release_prep::preparer::{ChangelogTarget, ReleasePreparer};
use tempfile::TempDir;

const CHANGELOG: &str = "# Changelog\n\n## [1.0.0] - 2024-01-01\n\n### Added\n\n- Initial release\n";

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"app\"\nversion = \"1.0.0\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "# App\n").unwrap();
    fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();
    dir
}

fn history() -> MockRepository {
    let mut repo = MockRepository::new();
    repo.add_commit("Initial commit");
    repo.tag_head("v1.0.0");
    repo.add_commit("feat: add export");
    repo.add_commit("Merge branch 'feature/export'");
    repo.add_commit("fix: resolve crash on empty file");
    repo
}

fn preparer(dir: &TempDir) -> ReleasePreparer {
    ReleasePreparer::new(dir.path(), ReleaseConfig::default()).with_release_date("2024-06-01")
}

#[test]
fn test_prepare_workflow_with_commits_and_tag() {
    let dir = project();
    let repo = history();

    let args = PrepareWorkflowArgs {
        version: "1.1.0".to_string(),
        auto: true,
        update_changelog: true,
        tag: true,
        ..Default::default()
    };
    let result = run_prepare_workflow(args, &preparer(&dir), Some(&repo)).unwrap();

    assert_eq!(result.version.to_string(), "1.1.0");
    assert_eq!(result.tag.as_deref(), Some("v1.1.0"));
    assert_eq!(
        repo.created_tags(),
        vec![("v1.1.0".to_string(), "Release v1.1.0".to_string())]
    );

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert_eq!(
        changelog,
        "# Changelog\n\n## [1.1.0] - 2024-06-01\n\n### Added\n\n- Add export\n\n### Fixed\n\n- Resolve crash on empty file\n\n## [1.0.0] - 2024-01-01\n\n### Added\n\n- Initial release\n"
    );
}

#[test]
fn test_prepare_workflow_fails_validation() {
    let dir = project();
    fs::remove_file(dir.path().join("README.md")).unwrap();

    let args = PrepareWorkflowArgs {
        version: "1.1.0".to_string(),
        ..Default::default()
    };
    let err = run_prepare_workflow::<MockRepository>(args, &preparer(&dir), None).unwrap_err();
    assert!(err.to_string().contains("Validation checks failed"));

    let manifest = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
    assert!(manifest.contains("version = \"1.0.0\""));
}

#[test]
fn test_prepare_workflow_skip_validation() {
    let dir = project();
    fs::remove_file(dir.path().join("README.md")).unwrap();

    let args = PrepareWorkflowArgs {
        version: "1.0.1".to_string(),
        skip_validation: true,
        ..Default::default()
    };
    let result = run_prepare_workflow::<MockRepository>(args, &preparer(&dir), None).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.tag, None);
}

#[test]
fn test_prepare_workflow_patch_continues_after_failed_checks() {
    let dir = project();
    fs::remove_file(dir.path().join("README.md")).unwrap();

    let args = PrepareWorkflowArgs {
        version: "1.0.1".to_string(),
        changes: vec!["Fix crash on exit".to_string()],
        update_changelog: true,
        patch: true,
        ..Default::default()
    };
    let result = run_prepare_workflow::<MockRepository>(args, &preparer(&dir), None).unwrap();
    assert!(result.warnings.contains(&BoundaryWarning::ValidationFailed));

    let manifest = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
    assert!(manifest.contains("version = \"1.0.1\""));
}

#[test]
fn test_prepare_workflow_tag_needs_repository() {
    let dir = project();
    let args = PrepareWorkflowArgs {
        version: "1.1.0".to_string(),
        tag: true,
        ..Default::default()
    };
    assert!(run_prepare_workflow::<MockRepository>(args, &preparer(&dir), None).is_err());
    let manifest = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
    assert!(manifest.contains("version = \"1.0.0\""));
}

#[test]
fn test_prepare_workflow_dry_run() {
    let dir = project();
    let repo = history();

    let args = PrepareWorkflowArgs {
        version: "1.1.0".to_string(),
        auto: true,
        update_changelog: true,
        tag: true,
        ..Default::default()
    };
    let result =
        run_prepare_workflow(args, &preparer(&dir).with_dry_run(true), Some(&repo)).unwrap();

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.tag, None);
    assert!(repo.created_tags().is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        CHANGELOG
    );
}

#[test]
fn test_prepare_workflow_warns_off_release_branch() {
    let dir = project();
    let mut repo = history();
    repo.set_branch(Some("feature/export"));

    let args = PrepareWorkflowArgs {
        version: "1.1.0".to_string(),
        changes: vec!["Add export".to_string()],
        update_changelog: true,
        ..Default::default()
    };
    let result = run_prepare_workflow(args, &preparer(&dir), Some(&repo)).unwrap();
    assert!(result.warnings.contains(&BoundaryWarning::NotOnReleaseBranch {
        branch: "feature/export".to_string()
    }));
}

#[test]
fn test_bump_workflow() {
    let dir = project();
    let repo = history();

    let args = BumpWorkflowArgs {
        kind: VersionBump::Minor,
        tag: false,
        yes: true,
    };
    let result = run_bump_workflow(args, &preparer(&dir), Some(&repo))
        .unwrap()
        .unwrap();
    assert_eq!(result.version.to_string(), "1.1.0");

    let manifest = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
    assert!(manifest.contains("version = \"1.1.0\""));
    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.contains("## [1.1.0] - 2024-06-01"));
}

#[test]
fn test_bump_workflow_at_limit() {
    let dir = project();
    fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"app\"\nversion = \"4294967295.0.0\"\n",
    )
    .unwrap();

    let args = BumpWorkflowArgs {
        kind: VersionBump::Major,
        tag: false,
        yes: true,
    };
    assert!(run_bump_workflow::<MockRepository>(args, &preparer(&dir), None).is_err());
    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        CHANGELOG
    );
}

#[test]
fn test_beta_workflow_prepares_and_tags() {
    let dir = project();
    let repo = history();

    let args = BetaWorkflowArgs {
        tag: true,
        yes: true,
        ..Default::default()
    };
    let result = run_beta_workflow(args, &preparer(&dir), Some(&repo))
        .unwrap()
        .unwrap();

    assert_eq!(result.version.to_string(), "1.0.0-beta.1");
    assert_eq!(result.tag.as_deref(), Some("v1.0.0-beta.1"));
    assert_eq!(repo.created_tags().len(), 1);

    let manifest = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
    assert!(manifest.contains("version = \"1.0.0-beta.1\""));
    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.starts_with(
        "# Changelog\n\n## [1.0.0-beta.1] - 2024-06-01 (Pre-release)\n\n### Added\n\n- Add export\n"
    ));
}

#[test]
fn test_beta_workflow_explicit_number() {
    let dir = project();
    let args = BetaWorkflowArgs {
        number: Some(2),
        changes: vec!["Add export".to_string()],
        yes: true,
        ..Default::default()
    };
    let result = run_beta_workflow::<MockRepository>(args, &preparer(&dir), None)
        .unwrap()
        .unwrap();
    assert_eq!(result.version.to_string(), "1.0.0-beta.2");
}

#[test]
fn test_changelog_workflow_unreleased_notes() {
    let dir = project();
    let args = ChangelogWorkflowArgs {
        target: ChangelogTarget::Unreleased,
        auto: false,
        since: None,
        add: vec!["Fixed critical bug".to_string()],
        interactive: false,
    };
    let warnings = run_changelog_workflow::<MockRepository>(args, &preparer(&dir), None).unwrap();
    assert!(warnings.is_empty());

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.starts_with(
        "# Changelog\n\n## [Unreleased] - Unreleased\n\n### Changed\n\n- Fixed critical bug\n\n## [1.0.0]"
    ));
}

#[test]
fn test_changelog_workflow_auto_since() {
    let dir = project();
    let mut repo = history();
    repo.tag_head("v1.0.1");
    repo.add_commit("docs: describe export");

    let args = ChangelogWorkflowArgs {
        target: ChangelogTarget::Version("1.0.2".to_string()),
        auto: true,
        since: Some("v1.0.1".to_string()),
        add: Vec::new(),
        interactive: false,
    };
    run_changelog_workflow(args, &preparer(&dir), Some(&repo)).unwrap();

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.contains("## [1.0.2] - 2024-06-01\n\n### Changed\n\n- Describe export\n"));
    assert!(!changelog.contains("Add export"));
}

#[test]
fn test_changelog_workflow_duplicate_version() {
    let dir = project();
    let args = ChangelogWorkflowArgs {
        target: ChangelogTarget::Version("v1.0.0".to_string()),
        auto: false,
        since: None,
        add: vec!["Again".to_string()],
        interactive: false,
    };
    let err = run_changelog_workflow::<MockRepository>(args, &preparer(&dir), None).unwrap_err();
    assert!(err.to_string().contains("already contains"));
}

#[test]
fn test_check_workflow() {
    let dir = project();
    assert!(run_check_workflow::<MockRepository>(&preparer(&dir), None).unwrap());

    fs::remove_file(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(!run_check_workflow::<MockRepository>(&preparer(&dir), None).unwrap());
}
