use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use release_prep::cli::orchestration::{
    self, BetaWorkflowArgs, BumpWorkflowArgs, ChangelogWorkflowArgs, PrepareWorkflowArgs,
};
use release_prep::config;
use release_prep::domain::VersionBump;
use release_prep::git::Git2Repository;
use release_prep::preparer::{ChangelogTarget, ReleasePreparer};
use release_prep::ui;
use release_prep::ReleasePrepError;

#[derive(Parser)]
#[command(
    name = "release-prep",
    version,
    about = "Advance the project version and changelog together"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Project root (defaults to the current directory)")]
    root: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set every version file to VERSION and record the release in the changelog
    Prepare {
        #[arg(help = "Version to prepare (e.g. 1.0.0, 1.1.0-beta.1)")]
        version: String,

        #[arg(long, num_args = 1.., help = "Changes to record in the changelog")]
        changes: Vec<String>,

        #[arg(long, help = "Generate changelog entries from commits since the last tag")]
        auto: bool,

        #[arg(long, value_name = "TAG", help = "Collect commits since this tag")]
        since: Option<String>,

        #[arg(long, help = "Only update version files")]
        no_changelog: bool,

        #[arg(long, help = "Create an annotated tag for the release")]
        tag: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(long, alias = "hotfix", help = "Skip pre-release validation checks")]
        skip_validation: bool,

        #[arg(
            long,
            conflicts_with = "skip_validation",
            help = "Patch release: report failed checks but continue"
        )]
        patch: bool,
    },

    /// Bump the current version and prepare that release
    Bump {
        #[arg(value_enum)]
        kind: VersionBump,

        #[arg(long, help = "Create an annotated tag for the release")]
        tag: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Prepare the next beta (X.Y.Z-beta.N) of the current version
    Beta {
        #[arg(long, value_name = "N", help = "Beta number (defaults to the next one)")]
        number: Option<u32>,

        #[arg(long, num_args = 1.., help = "Changes to record in the changelog")]
        changes: Vec<String>,

        #[arg(long, help = "Create an annotated tag for the beta")]
        tag: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Add a section to the changelog without touching version files
    Changelog(ChangelogArgs),

    /// Check that version files agree and required files exist
    Check,
}

#[derive(ClapArgs)]
struct ChangelogArgs {
    #[arg(
        long,
        required_unless_present = "unreleased",
        conflicts_with = "unreleased",
        help = "Version the section is for"
    )]
    version: Option<String>,

    #[arg(long, help = "Add to the Unreleased section")]
    unreleased: bool,

    #[arg(long, help = "Generate entries from commits since the last tag")]
    auto: bool,

    #[arg(long, value_name = "TAG", help = "Collect commits since this tag")]
    since: Option<String>,

    #[arg(long, value_name = "CHANGE", help = "Add a change under Changed (repeatable)")]
    add: Vec<String>,

    #[arg(short, long, help = "Enter changes interactively")]
    interactive: bool,

    #[arg(long, help = "Print the section without writing it")]
    dry_run: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            if e
                .downcast_ref::<ReleasePrepError>()
                .is_some_and(ReleasePrepError::is_validation_error)
            {
                ui::display_status("No files were modified");
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let config = config::load_config(cli.config.as_deref(), &root)?;

    // Outside a git repository only history-dependent options fail
    let repo = match Git2Repository::open(&root) {
        Ok(repo) => Some(repo),
        Err(e) => {
            debug!(error = %e, "no git repository");
            None
        }
    };

    match cli.command {
        Command::Prepare {
            version,
            changes,
            auto,
            since,
            no_changelog,
            tag,
            dry_run,
            skip_validation,
            patch,
        } => {
            let preparer = ReleasePreparer::new(&root, config).with_dry_run(dry_run);
            let args = PrepareWorkflowArgs {
                version,
                changes,
                auto,
                since,
                update_changelog: !no_changelog,
                tag,
                skip_validation,
                patch,
            };
            orchestration::run_prepare_workflow(args, &preparer, repo.as_ref())?;
        }
        Command::Bump {
            kind,
            tag,
            yes,
            dry_run,
        } => {
            let preparer = ReleasePreparer::new(&root, config).with_dry_run(dry_run);
            let args = BumpWorkflowArgs { kind, tag, yes };
            orchestration::run_bump_workflow(args, &preparer, repo.as_ref())?;
        }
        Command::Beta {
            number,
            changes,
            tag,
            yes,
            dry_run,
        } => {
            let preparer = ReleasePreparer::new(&root, config).with_dry_run(dry_run);
            let args = BetaWorkflowArgs {
                number,
                changes,
                tag,
                yes,
            };
            orchestration::run_beta_workflow(args, &preparer, repo.as_ref())?;
        }
        Command::Changelog(changelog) => {
            let preparer = ReleasePreparer::new(&root, config).with_dry_run(changelog.dry_run);
            let target = match changelog.version {
                Some(version) => ChangelogTarget::Version(version),
                None => ChangelogTarget::Unreleased,
            };
            let args = ChangelogWorkflowArgs {
                target,
                auto: changelog.auto,
                since: changelog.since,
                add: changelog.add,
                interactive: changelog.interactive,
            };
            orchestration::run_changelog_workflow(args, &preparer, repo.as_ref())?;
        }
        Command::Check => {
            let preparer = ReleasePreparer::new(&root, config);
            return orchestration::run_check_workflow(&preparer, repo.as_ref());
        }
    }

    Ok(true)
}
