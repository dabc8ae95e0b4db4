//! Version fields inside project metadata files
//!
//! Each supported file shape has a named [`VersionFormat`] with an
//! `extract`/`substitute` pair, so a change in one file's layout only touches
//! its own pattern.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReleasePrepError, Result};

/// How the version is written inside a file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "format", rename_all = "kebab-case")]
pub enum VersionFormat {
    /// `key = "X.Y.Z"` with either quote style and any spacing
    /// (`__version__` in a Python module, `version` in setup.py or Cargo.toml).
    /// The first assignment is authoritative and is the only one rewritten.
    Assignment { key: String },
    /// PyInstaller version resource: `'FileVersion', 'X.Y.Z'` and
    /// `'ProductVersion', 'X.Y.Z'`. Both pairs are rewritten.
    SpecTuple,
}

impl VersionFormat {
    fn pattern(&self) -> Result<Regex> {
        let pattern = match self {
            // The key must not continue an identifier on its left, so
            // `rust-version` and `python_version` do not match `version`
            VersionFormat::Assignment { key } => format!(
                r#"(?m)(^|[^\w.-]){}(\s*=\s*)(["'])([^"']+)["']"#,
                regex::escape(key)
            ),
            VersionFormat::SpecTuple => {
                r"'(FileVersion|ProductVersion)'(,\s*)'([^']*)'".to_string()
            }
        };
        Ok(Regex::new(&pattern)?)
    }

    /// Read the version value from file content
    pub fn extract(&self, content: &str) -> Result<Option<String>> {
        let re = self.pattern()?;
        let value_group = match self {
            VersionFormat::Assignment { .. } => 4,
            VersionFormat::SpecTuple => 3,
        };
        Ok(re
            .captures(content)
            .and_then(|caps| caps.get(value_group))
            .map(|m| m.as_str().to_string()))
    }

    /// Rewrite the version value, returning `None` when the field is absent
    pub fn substitute(&self, content: &str, version: &str) -> Result<Option<String>> {
        let re = self.pattern()?;
        if !re.is_match(content) {
            return Ok(None);
        }

        let updated = match self {
            VersionFormat::Assignment { key } => re
                .replacen(content, 1, |caps: &Captures| {
                    format!(
                        "{}{}{}{}{}{}",
                        &caps[1], key, &caps[2], &caps[3], version, &caps[3]
                    )
                })
                .into_owned(),
            VersionFormat::SpecTuple => re
                .replace_all(content, |caps: &Captures| {
                    format!("'{}'{}'{}'", &caps[1], &caps[2], version)
                })
                .into_owned(),
        };
        Ok(Some(updated))
    }
}

/// A project file carrying the version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionFile {
    /// Path relative to the project root
    pub path: PathBuf,

    #[serde(flatten)]
    pub format: VersionFormat,

    /// A missing required file aborts the release; a missing optional file
    /// is only reported
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>, format: VersionFormat, required: bool) -> Self {
        VersionFile {
            path: path.into(),
            format,
            required,
        }
    }

    /// Absolute location under `root`
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }

    /// Read the declared version from disk
    ///
    /// # Returns
    /// * `Ok(version)` - The version string as written in the file
    /// * `Err(MissingVersionSource)` - If the file or the field cannot be found
    pub fn read_version(&self, root: &Path) -> Result<String> {
        let content = self.read(root)?;
        self.format.extract(&content)?.ok_or_else(|| {
            ReleasePrepError::missing_source(&self.path, "version assignment not found")
        })
    }

    /// Content of the file with the version replaced; nothing is written
    pub fn staged_update(&self, root: &Path, version: &str) -> Result<String> {
        let content = self.read(root)?;
        let updated = self.format.substitute(&content, version)?.ok_or_else(|| {
            ReleasePrepError::missing_source(&self.path, "version assignment not found")
        })?;
        debug!(path = %self.path.display(), version, "staged version update");
        Ok(updated)
    }

    fn read(&self, root: &Path) -> Result<String> {
        let path = self.resolve(root);
        if !path.is_file() {
            return Err(ReleasePrepError::missing_source(&self.path, "file not found"));
        }
        Ok(fs::read_to_string(path)?)
    }
}

/// Replace a file's content in one step: write a sibling temp file, then
/// rename it over the target.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    use std::io::Write;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = (|| -> std::io::Result<()> {
        let mut temp = fs::File::create(&temp_path)?;
        temp.write_all(content.as_bytes())?;
        temp.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result.map_err(ReleasePrepError::from)
}
