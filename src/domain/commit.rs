use crate::domain::category::ChangeCategory;
use regex::Regex;

/// Conventional commit types recognised for classification, with the change
/// category each one files under. Order is irrelevant; types are disjoint.
pub const CONVENTIONAL_TYPES: &[(&str, ChangeCategory)] = &[
    ("feat", ChangeCategory::Added),
    ("fix", ChangeCategory::Fixed),
    ("docs", ChangeCategory::Changed),
    ("style", ChangeCategory::Changed),
    ("refactor", ChangeCategory::Changed),
    ("perf", ChangeCategory::Changed),
    ("test", ChangeCategory::Changed),
    ("build", ChangeCategory::Changed),
    ("ci", ChangeCategory::Changed),
    ("chore", ChangeCategory::Changed),
    ("revert", ChangeCategory::Fixed),
];

/// Conventional commit prefix parsed from a commit subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub description: String,
}

impl ParsedCommit {
    /// Parse the conventional commit prefix of a message
    ///
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// The type is matched case-insensitively and must be one of
    /// [`CONVENTIONAL_TYPES`]. Scope and breaking marker are accepted but do
    /// not affect the category. Returns `None` for anything else.
    pub fn parse(message: &str) -> Option<Self> {
        let subject = message.lines().next().unwrap_or("");
        let captures = Regex::new(r"^(?i)([a-z]+)(?:\([^)]+\))?!?:\s*(.*)$")
            .ok()
            .and_then(|re| re.captures(subject))?;

        let r#type = captures.get(1)?.as_str().to_lowercase();
        if !CONVENTIONAL_TYPES.iter().any(|(name, _)| *name == r#type) {
            return None;
        }

        let description = captures
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Some(ParsedCommit {
            r#type,
            description,
        })
    }

    /// Change category implied by the commit type
    pub fn category(&self) -> ChangeCategory {
        CONVENTIONAL_TYPES
            .iter()
            .find(|(name, _)| *name == self.r#type)
            .map(|(_, category)| *category)
            .unwrap_or(ChangeCategory::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_scope() {
        let commit = ParsedCommit::parse("feat(auth): add login").unwrap();
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.description, "add login");
    }

    #[test]
    fn test_parse_with_breaking_marker() {
        let commit = ParsedCommit::parse("feat(auth)!: redesign login").unwrap();
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.description, "redesign login");
    }

    #[test]
    fn test_parse_breaking_without_scope() {
        let commit = ParsedCommit::parse("fix!: drop old flag").unwrap();
        assert_eq!(commit.category(), ChangeCategory::Fixed);
        assert_eq!(commit.description, "drop old flag");
    }

    #[test]
    fn test_parse_uppercase_type() {
        let commit = ParsedCommit::parse("Fix: handle empty input").unwrap();
        assert_eq!(commit.r#type, "fix");
        assert_eq!(commit.category(), ChangeCategory::Fixed);
    }

    #[test]
    fn test_parse_unknown_type() {
        assert_eq!(ParsedCommit::parse("wip: half done"), None);
        assert_eq!(ParsedCommit::parse("Random commit message"), None);
    }

    #[test]
    fn test_parse_uses_subject_line() {
        let commit = ParsedCommit::parse("docs: tidy readme\n\nlonger body: with colon").unwrap();
        assert_eq!(commit.description, "tidy readme");
    }

    #[test]
    fn test_type_categories() {
        let category = |msg: &str| ParsedCommit::parse(msg).unwrap().category();
        assert_eq!(category("feat: x"), ChangeCategory::Added);
        assert_eq!(category("revert: x"), ChangeCategory::Fixed);
        assert_eq!(category("perf: x"), ChangeCategory::Changed);
        assert_eq!(category("ci: x"), ChangeCategory::Changed);
    }
}
