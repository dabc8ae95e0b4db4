use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{SemanticVersion, Tag, TagPattern};
use crate::error::{ReleasePrepError, Result};
use crate::version_files::{VersionFile, VersionFormat};

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "release-prep.toml";

/// Represents the complete configuration for release-prep.
///
/// Contains the changelog location, release conventions and the files that
/// carry the project version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub release: ReleaseSettings,

    /// The first entry is the authoritative version source
    #[serde(default = "default_version_files")]
    pub version_files: Vec<VersionFile>,
}

/// Returns the default version file list: the crate manifest.
fn default_version_files() -> Vec<VersionFile> {
    vec![VersionFile::new(
        "Cargo.toml",
        VersionFormat::Assignment {
            key: "version".to_string(),
        },
        true,
    )]
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

/// Changelog location
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
        }
    }
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_tag_message() -> String {
    "Release {tag}".to_string()
}

fn default_release_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

fn default_required_files() -> Vec<PathBuf> {
    vec![PathBuf::from("README.md"), PathBuf::from("CHANGELOG.md")]
}

/// Release conventions: tag naming, branches, and the files a release needs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseSettings {
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// `{tag}` and `{version}` are substituted
    #[serde(default = "default_tag_message")]
    pub tag_message: String,

    #[serde(default = "default_release_branches")]
    pub release_branches: Vec<String>,

    #[serde(default = "default_required_files")]
    pub required_files: Vec<PathBuf>,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        ReleaseSettings {
            tag_pattern: default_tag_pattern(),
            tag_message: default_tag_message(),
            release_branches: default_release_branches(),
            required_files: default_required_files(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            changelog: ChangelogConfig::default(),
            release: ReleaseSettings::default(),
            version_files: default_version_files(),
        }
    }
}

impl ReleaseConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ReleaseConfig =
            toml::from_str(text).map_err(|e| ReleasePrepError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.version_files.is_empty() {
            return Err(ReleasePrepError::config(
                "at least one entry in [[version_files]] is required",
            ));
        }
        TagPattern::new(&self.release.tag_pattern)?;
        Ok(())
    }

    /// The file the current version is read from
    pub fn version_source(&self) -> Option<&VersionFile> {
        self.version_files.first()
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(&self.release.tag_pattern)
    }

    /// Tag and annotation message for a release of `version`
    pub fn release_tag(&self, version: &SemanticVersion) -> Result<(Tag, String)> {
        let tag = self.tag_pattern()?.format(version);
        let message = self
            .release
            .tag_message
            .replace("{tag}", &tag.name)
            .replace("{version}", &version.format());
        Ok((tag, message))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-prep.toml` in the project root
/// 3. `release-prep.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_root` - Root of the project being released
///
/// # Returns
/// * `Ok(ReleaseConfig)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<ReleaseConfig> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if project_root.join(CONFIG_FILE_NAME).is_file() {
        Some(project_root.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
    };

    match candidate {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                ReleasePrepError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            ReleaseConfig::from_toml(&text)
        }
        None => {
            debug!("no configuration file found, using defaults");
            Ok(ReleaseConfig::default())
        }
    }
}
