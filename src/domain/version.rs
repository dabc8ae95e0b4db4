use crate::domain::prerelease::PreRelease;
use crate::error::{ReleasePrepError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Grammar accepted for version strings. A leading `v` is tolerated.
pub const VERSION_PATTERN: &str = r"^v?(\d+)\.(\d+)\.(\d+)(-([a-zA-Z]+)\.(\d+))?$";

/// Label used for beta pre-releases
pub const BETA_LABEL: &str = "beta";

/// Semantic version with an optional `label.N` pre-release suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: Option<PreRelease>,
}

impl SemanticVersion {
    /// Create a new release version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parse a version string (e.g., "v1.2.3" or "1.1.0-beta.1")
    ///
    /// The leading `v` is stripped and never retained. Any string outside the
    /// grammar, including components that overflow `u32`, is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let re = Regex::new(VERSION_PATTERN)?;
        let captures = re
            .captures(raw)
            .ok_or_else(|| ReleasePrepError::invalid_version(raw))?;

        let number = |idx: usize| -> Result<u32> {
            captures
                .get(idx)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(|| ReleasePrepError::invalid_version(raw))
        };

        let prerelease = match (captures.get(5), captures.get(6)) {
            (Some(label), Some(_)) => Some(PreRelease::new(label.as_str(), number(6)?)?),
            _ => None,
        };

        Ok(SemanticVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            prerelease,
        })
    }

    /// Canonical string form; the exact inverse of [`SemanticVersion::parse`]
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Bump version according to bump type
    ///
    /// A bump always targets a release version, so any pre-release suffix is
    /// dropped. Fails with `VersionOverflow` when the bumped component is
    /// already `u32::MAX`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || ReleasePrepError::VersionOverflow(self.to_string());
        let next = match bump_type {
            VersionBump::Major => {
                SemanticVersion::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => SemanticVersion::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            VersionBump::Patch => SemanticVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(next)
    }

    /// Next beta of this version: `1.2.0` gives `1.2.0-beta.1` and
    /// `1.2.0-beta.3` gives `1.2.0-beta.4`. Any other label starts over at
    /// `beta.1`.
    pub fn next_beta(&self) -> Result<Self> {
        match &self.prerelease {
            Some(current) if current.label == BETA_LABEL => Ok(SemanticVersion {
                prerelease: Some(current.next()?),
                ..self.clone()
            }),
            _ => self.with_beta(1),
        }
    }

    /// Same version triple as beta `number`
    pub fn with_beta(&self, number: u32) -> Result<Self> {
        Ok(SemanticVersion {
            prerelease: Some(PreRelease::new(BETA_LABEL, number)?),
            ..self.clone()
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleasePrepError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                // A release sorts after every pre-release of the same triple
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(prerelease) = &self.prerelease {
            write!(f, "-{}", prerelease)?;
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
