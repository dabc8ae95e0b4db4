//! Commit classification into changelog categories

use crate::changelog::CategorizedEntries;
use crate::domain::{ChangeCategory, ParsedCommit};
use tracing::debug;

/// Keyword buckets scanned when a message carries no conventional prefix.
/// The first bucket containing a matching keyword wins.
pub const KEYWORD_BUCKETS: &[(&[&str], ChangeCategory)] = &[
    (&["add", "new", "implement", "create"], ChangeCategory::Added),
    (&["fix", "resolve", "correct", "patch"], ChangeCategory::Fixed),
    (&["remove", "delete", "drop"], ChangeCategory::Removed),
    (&["update", "change", "modify", "improve"], ChangeCategory::Changed),
    (&["deprecate"], ChangeCategory::Deprecated),
    (&["security", "vulnerability"], ChangeCategory::Security),
];

/// Classify a commit message into a change category.
///
/// A conventional commit prefix always takes priority over keywords, so
/// "fix: improve performance" is Fixed even though "improve" says Changed.
pub fn classify(message: &str) -> ChangeCategory {
    if let Some(parsed) = ParsedCommit::parse(message) {
        return parsed.category();
    }

    let lowered = message.to_lowercase();
    KEYWORD_BUCKETS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(ChangeCategory::Changed)
}

/// Turn a commit subject into a changelog bullet: drop the conventional
/// prefix, capitalize the first letter, strip trailing periods.
pub fn clean(message: &str) -> String {
    let subject = message.lines().next().unwrap_or("").trim();
    let text = match ParsedCommit::parse(subject) {
        Some(parsed) => parsed.description,
        None => subject.to_string(),
    };

    let mut chars = text.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    capitalized.trim_end_matches('.').trim_end().to_string()
}

/// Merge commits and version bumps never reach the changelog.
pub fn is_excluded(message: &str) -> bool {
    let subject = message.lines().next().unwrap_or("").trim_start();
    if subject.starts_with("Merge ")
        || subject.starts_with("Version ")
        || subject.starts_with("Bump version")
    {
        return true;
    }

    let lowered = subject.to_lowercase();
    lowered.contains("version")
        && ["bump", "update", "prepare"]
            .iter()
            .any(|word| lowered.contains(word))
}

/// Classify commit messages into deduplicated changelog entries.
///
/// Excluded messages are skipped; categories left empty are absent from the
/// result.
pub fn categorize_commits<S: AsRef<str>>(messages: &[S]) -> CategorizedEntries {
    let mut categories = CategorizedEntries::new();
    let mut skipped = 0usize;

    for message in messages.iter().map(AsRef::as_ref) {
        if is_excluded(message) {
            skipped += 1;
            continue;
        }
        push_entry(&mut categories, classify(message), clean(message));
    }

    debug!(
        total = messages.len(),
        skipped,
        categories = categories.len(),
        "commits categorized"
    );
    categories
}

/// Classify manually written change notes. Notes are taken as intended, so
/// the commit exclusion rules do not apply.
pub fn categorize_notes<S: AsRef<str>>(notes: &[S]) -> CategorizedEntries {
    let mut categories = CategorizedEntries::new();
    for note in notes.iter().map(AsRef::as_ref) {
        push_entry(&mut categories, classify(note), clean(note));
    }
    categories
}

fn push_entry(categories: &mut CategorizedEntries, category: ChangeCategory, entry: String) {
    if entry.is_empty() {
        return;
    }
    let entries = categories.entry(category).or_default();
    if !entries.contains(&entry) {
        entries.push(entry);
    }
}
