use crate::domain::version::SemanticVersion;
use crate::error::{ReleasePrepError, Result};

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Version carried by the tag, if the name is a plain version tag
    /// (e.g., "v1.2.3" -> 1.2.3)
    pub fn version(&self) -> Option<SemanticVersion> {
        SemanticVersion::parse(&self.name).ok()
    }
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    ///
    /// The pattern must contain exactly one `{version}` placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches("{version}").count() != 1 {
            return Err(ReleasePrepError::config(format!(
                "Tag pattern '{}' must contain exactly one {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> Tag {
        Tag::new(self.pattern.replace("{version}", &version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_version() {
        let tag = Tag::new("v1.2.3");
        assert_eq!(tag.version(), Some(SemanticVersion::new(1, 2, 3)));
    }

    #[test]
    fn test_tag_version_unparsable() {
        assert_eq!(Tag::new("release-2024").version(), None);
    }

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        let version = SemanticVersion::parse("1.1.0-beta.1").unwrap();
        assert_eq!(pattern.format(&version).name, "v1.1.0-beta.1");
    }

    #[test]
    fn test_pattern_format_with_prefix() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(
            pattern.format(&SemanticVersion::new(1, 2, 3)).name,
            "release-1.2.3"
        );
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("latest").is_err());
        assert!(TagPattern::new("{version}-{version}").is_err());
    }
}
