use std::fmt;
use std::str::FromStr;

/// Keep-a-Changelog change category
///
/// Variant order is the render order of category blocks inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeCategory {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl ChangeCategory {
    /// All categories in render order
    pub const ALL: [ChangeCategory; 6] = [
        ChangeCategory::Added,
        ChangeCategory::Changed,
        ChangeCategory::Deprecated,
        ChangeCategory::Removed,
        ChangeCategory::Fixed,
        ChangeCategory::Security,
    ];

    /// Heading text used in `### <name>` blocks
    pub fn name(&self) -> &'static str {
        match self {
            ChangeCategory::Added => "Added",
            ChangeCategory::Changed => "Changed",
            ChangeCategory::Deprecated => "Deprecated",
            ChangeCategory::Removed => "Removed",
            ChangeCategory::Fixed => "Fixed",
            ChangeCategory::Security => "Security",
        }
    }
}

impl FromStr for ChangeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChangeCategory::ALL
            .iter()
            .copied()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown change category: '{}'", s))
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_all() {
        let mut sorted = ChangeCategory::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, ChangeCategory::ALL.to_vec());
    }

    #[test]
    fn test_category_from_heading() {
        assert_eq!("Fixed".parse::<ChangeCategory>(), Ok(ChangeCategory::Fixed));
        assert_eq!(" security ".parse::<ChangeCategory>(), Ok(ChangeCategory::Security));
        assert!("Other".parse::<ChangeCategory>().is_err());
    }
}
