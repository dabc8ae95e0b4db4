//! Pre-release suffix of a semantic version
//!
//! Release versions of this project carry pre-release suffixes of the shape
//! `label.N` (e.g. `beta.1`, `rc.3`): an alphabetic label followed by a
//! numeric iteration. Both parts are always present.

use crate::error::{ReleasePrepError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Pre-release label with its iteration number
///
/// # Examples
/// - "beta.1" -> PreRelease { label: "beta", number: 1 }
/// - "rc.3" -> PreRelease { label: "rc", number: 3 }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreRelease {
    /// Alphabetic identifier (alpha, beta, rc, ...), stored as written
    pub label: String,
    /// Iteration number within the label
    pub number: u32,
}

impl PreRelease {
    /// Create a new pre-release suffix
    ///
    /// # Arguments
    /// * `label` - Alphabetic label; must be non-empty ASCII letters
    /// * `number` - Iteration number
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - Valid suffix
    /// * `Err` - If the label is empty or contains non-letters
    pub fn new(label: impl Into<String>, number: u32) -> Result<Self> {
        let label = label.into();
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ReleasePrepError::invalid_version(format!(
                "{}.{}",
                label, number
            )));
        }
        Ok(PreRelease { label, number })
    }

    /// Parse a pre-release suffix such as "beta.1"
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Next iteration of the same label (beta.1 -> beta.2)
    pub fn next(&self) -> Result<Self> {
        let number = self
            .number
            .checked_add(1)
            .ok_or_else(|| ReleasePrepError::VersionOverflow(self.to_string()))?;
        Ok(PreRelease {
            label: self.label.clone(),
            number,
        })
    }
}

impl FromStr for PreRelease {
    type Err = ReleasePrepError;

    fn from_str(s: &str) -> Result<Self> {
        let (label, number) = s
            .split_once('.')
            .ok_or_else(|| ReleasePrepError::invalid_version(s))?;
        let number = number
            .parse::<u32>()
            .map_err(|_| ReleasePrepError::invalid_version(s))?;
        PreRelease::new(label, number).map_err(|_| ReleasePrepError::invalid_version(s))
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label
            .cmp(&other.label)
            .then(self.number.cmp(&other.number))
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.number)
    }
}
