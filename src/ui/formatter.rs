//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here print and nothing else.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::changelog::ChangelogSection;
use crate::git::CommitInfo;
use crate::preparer::ConsistencyReport;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the commits a changelog is generated from.
///
/// Shows up to 10 subjects; the rest are summarized by count.
///
/// # Arguments
/// * `commits` - Commits collected from history, oldest first
/// * `since` - The tag the range starts from, if any
pub fn display_commit_analysis(commits: &[CommitInfo], since: Option<&str>) {
    match since {
        Some(tag) => println!(
            "\n{}",
            style(format!("Commits since '{}'", tag)).bold()
        ),
        None => println!("\n{}", style("Commits in history").bold()),
    }
    println!("{}", style(format!("{} commits:", commits.len())).underlined());

    for (i, commit) in commits.iter().take(10).enumerate() {
        let short_msg: String = commit.message.chars().take(60).collect();
        println!("  {}. {} {}", i + 1, style(&commit.hash).dim(), short_msg);
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Display a changelog section as it will be written.
pub fn display_section_preview(section: &ChangelogSection) {
    let rule = "=".repeat(50);
    println!("\n{}", style("Changelog entry:").bold());
    println!("{}", rule);
    print!("{}", section.render());
    println!("{}", rule);
}

/// Display the proposed version change.
///
/// # Arguments
/// * `current` - Version declared by the project now
/// * `target` - The version being prepared
pub fn display_proposed_version(current: &str, target: &str) {
    println!("\n{}", style("Proposed Version Change:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {}", style(target).green());
}

/// Display the version declared by each configured file and any missing
/// project files.
pub fn display_consistency_report(report: &ConsistencyReport) {
    println!("\n{}", style("Version files:").bold());
    for reading in &report.readings {
        match &reading.version {
            Some(version) => println!("  {} {}: {}", style("✓").green(), reading.path.display(), version),
            None if reading.required => {
                println!("  {} {}: not found", style("✗").red(), reading.path.display())
            }
            None => println!("  {} {}: not found (optional)", style("-").dim(), reading.path.display()),
        }
    }

    if !report.missing_files.is_empty() {
        println!("\n{}", style("Missing required files:").bold());
        for path in &report.missing_files {
            println!("  {} {}", style("✗").red(), path.display());
        }
    }

    if report.is_ok() {
        display_success("All version checks passed");
    } else if !report.versions_consistent() {
        display_error("Version files disagree or are missing a version");
    } else {
        display_error("Required files are missing");
    }
}

/// Display what is left to do after files were prepared.
///
/// # Arguments
/// * `tag` - The tag for the release
/// * `tagged` - Whether the tag was already created
pub fn display_next_steps(tag: &str, tagged: bool) {
    println!("\n{}", style("Next steps:").bold());
    println!("  1. Review and commit changes");
    if tagged {
        println!("  2. Push the tag: {}", style(format!("git push origin {}", tag)).cyan());
    } else {
        println!(
            "  2. Create and push the tag: {}",
            style(format!("git tag {0} && git push origin {0}", tag)).cyan()
        );
    }
}
