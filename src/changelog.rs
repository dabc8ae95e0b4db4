//! Keep-a-Changelog document model
//!
//! A changelog is a preamble followed by version sections, newest first:
//!
//! ```text
//! # Changelog
//!
//! ## [Unreleased] - Unreleased
//!
//! ### Added
//!
//! - Dark mode
//!
//! ## [1.2.0] - 2024-05-01
//! ...
//! ```
//!
//! Sections loaded from disk keep their original text and render it back
//! verbatim, so inserting a new release never rewrites history below the
//! insertion point. Amending a loaded Unreleased section splices the new
//! bullets into that text. Only newly built sections are rendered in
//! canonical form.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use crate::domain::{ChangeCategory, SemanticVersion};

/// Entries grouped by category; iteration follows category order
pub type CategorizedEntries = BTreeMap<ChangeCategory, Vec<String>>;

/// Label and date of the section collecting changes not yet released
pub const UNRELEASED: &str = "Unreleased";

/// Appended to a header whose version carries a pre-release suffix
pub const PRERELEASE_SUFFIX: &str = " (Pre-release)";

/// Preamble used when no changelog exists yet
pub const DEFAULT_PREAMBLE: &str = "# Changelog

All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).

";

const SECTION_MARKER: &str = "## [";

/// One version block of the changelog
#[derive(Debug, Clone)]
pub struct ChangelogSection {
    version_label: String,
    date_label: String,
    entries: CategorizedEntries,
    /// Original text for sections read from a file
    source: Option<String>,
}

impl ChangelogSection {
    /// Build a new section from categorized entries.
    ///
    /// Blank entries and duplicates are dropped and categories left empty are
    /// omitted; blocks render in category order regardless of input order.
    pub fn build<I>(version_label: impl Into<String>, date_label: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = (ChangeCategory, Vec<String>)>,
    {
        let mut entries = CategorizedEntries::new();
        for (category, items) in categories {
            merge_entries(&mut entries, category, items);
        }

        ChangelogSection {
            version_label: version_label.into(),
            date_label: date_label.into(),
            entries,
            source: None,
        }
    }

    /// Build the Unreleased section
    pub fn unreleased<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = (ChangeCategory, Vec<String>)>,
    {
        Self::build(UNRELEASED, UNRELEASED, categories)
    }

    pub fn version_label(&self) -> &str {
        &self.version_label
    }

    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    pub fn entries(&self) -> &CategorizedEntries {
        &self.entries
    }

    /// Entries of one category, empty when the category is absent
    pub fn entries_for(&self, category: ChangeCategory) -> &[String] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    pub fn is_unreleased(&self) -> bool {
        self.version_label.eq_ignore_ascii_case(UNRELEASED)
    }

    /// Whether this section describes the given version label
    pub fn matches_version(&self, label: &str) -> bool {
        match (
            SemanticVersion::parse(&self.version_label),
            SemanticVersion::parse(label),
        ) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => self.version_label.eq_ignore_ascii_case(label),
        }
    }

    /// `## [version] - date`, with the pre-release marker when applicable
    pub fn header(&self) -> String {
        let mut header = format!("{}{}]", SECTION_MARKER, self.version_label);
        if !self.date_label.is_empty() {
            header.push_str(" - ");
            header.push_str(&self.date_label);
        }
        if SemanticVersion::parse(&self.version_label)
            .map(|v| v.is_prerelease())
            .unwrap_or(false)
        {
            header.push_str(PRERELEASE_SUFFIX);
        }
        header
    }

    /// Add entries to this section.
    ///
    /// A section loaded from a file keeps every line it had, unknown `###`
    /// blocks included; new bullets are spliced into the matching category
    /// block.
    pub fn amend(&mut self, other: ChangelogSection) {
        for (category, items) in other.entries {
            let known = self.entries_for(category).len();
            merge_entries(&mut self.entries, category, items);
            let added = self.entries_for(category)[known..].to_vec();
            if added.is_empty() {
                continue;
            }
            if let Some(source) = self.source.take() {
                self.source = Some(splice_entries(&source, category, &added));
            }
        }
    }

    /// Section text, always terminated by a newline
    pub fn render(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => self.render_canonical(),
        }
    }

    fn render_canonical(&self) -> String {
        let mut lines = vec![self.header(), String::new()];
        for (category, items) in &self.entries {
            if items.is_empty() {
                continue;
            }
            lines.push(format!("### {}", category));
            lines.push(String::new());
            lines.extend(items.iter().map(|item| format!("- {}", item)));
            lines.push(String::new());
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Parse a raw section beginning with its `## [` header line
    fn parse(raw: String) -> Self {
        let mut lines = raw.lines();
        let header = lines.next().unwrap_or("").trim_end();
        let (version_label, date_label) = parse_header(header);

        let mut entries = CategorizedEntries::new();
        let mut current: Option<ChangeCategory> = None;
        for line in lines {
            let line = line.trim();
            if let Some(name) = line.strip_prefix("### ") {
                current = name.parse().ok();
            } else if line.starts_with('#') {
                current = None;
            } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                if let Some(category) = current {
                    entries.entry(category).or_default().push(item.trim().to_string());
                }
            }
        }

        ChangelogSection {
            version_label,
            date_label,
            entries,
            source: Some(raw),
        }
    }
}

/// Sections compare by structure: labels and categorized entries. Whether a
/// section came from a file does not matter.
impl PartialEq for ChangelogSection {
    fn eq(&self, other: &Self) -> bool {
        self.version_label == other.version_label
            && self.date_label == other.date_label
            && self.entries == other.entries
    }
}

impl Eq for ChangelogSection {}

/// Entries are single bullets: only the first non-blank line of an item is
/// kept, so every entry reloads as written.
fn merge_entries(entries: &mut CategorizedEntries, category: ChangeCategory, items: Vec<String>) {
    for item in items {
        let Some(item) = item.lines().map(str::trim).find(|line| !line.is_empty()) else {
            continue;
        };
        let item = item.to_string();
        let bucket = entries.entry(category).or_default();
        if !bucket.contains(&item) {
            bucket.push(item);
        }
    }
    if entries.get(&category).is_some_and(Vec::is_empty) {
        entries.remove(&category);
    }
}

fn heading_category(line: &str) -> Option<ChangeCategory> {
    line.trim()
        .strip_prefix("### ")
        .and_then(|name| name.parse().ok())
}

fn is_bullet(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("- ") || line.starts_with("* ")
}

/// Insert bullets into one category block of raw section text.
///
/// Bullets go after the last bullet of the block. A missing block is created
/// ahead of the first later category, or at the end of the section.
fn splice_entries(source: &str, category: ChangeCategory, items: &[String]) -> String {
    let mut lines: Vec<String> = source.lines().map(str::to_string).collect();
    let bullets: Vec<String> = items.iter().map(|item| format!("- {}", item)).collect();

    if let Some(start) = lines.iter().position(|l| heading_category(l) == Some(category)) {
        let body = start + 1;
        let end = lines[body..]
            .iter()
            .position(|l| l.trim_start().starts_with('#'))
            .map_or(lines.len(), |i| body + i);
        match lines[body..end].iter().rposition(|l| is_bullet(l)) {
            Some(last) => {
                let at = body + last + 1;
                lines.splice(at..at, bullets);
            }
            None => {
                let block = std::iter::once(String::new()).chain(bullets);
                lines.splice(body..body, block);
            }
        }
    } else {
        let mut block = vec![format!("### {}", category), String::new()];
        block.extend(bullets);
        match lines
            .iter()
            .position(|l| heading_category(l).is_some_and(|c| c > category))
        {
            Some(at) => {
                block.push(String::new());
                lines.splice(at..at, block);
            }
            None => {
                let trailing = lines.iter().rev().take_while(|l| l.trim().is_empty()).count();
                let at = lines.len() - trailing;
                block.insert(0, String::new());
                lines.splice(at..at, block);
            }
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn parse_header(header: &str) -> (String, String) {
    let captures = Regex::new(r"^## \[([^\]]*)\](?:\s*-\s*(.*))?")
        .ok()
        .and_then(|re| re.captures(header));

    let Some(captures) = captures else {
        return (String::new(), String::new());
    };

    let version = captures
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let date = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .map(|d| d.strip_suffix(PRERELEASE_SUFFIX.trim()).unwrap_or(d).trim())
        .unwrap_or("")
        .to_string();

    (version, date)
}

/// In-memory changelog: preamble plus version sections, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    preamble: String,
    sections: Vec<ChangelogSection>,
}

impl Default for ChangelogDocument {
    fn default() -> Self {
        ChangelogDocument {
            preamble: DEFAULT_PREAMBLE.to_string(),
            sections: Vec::new(),
        }
    }
}

impl ChangelogDocument {
    /// Parse changelog text. Never fails: text without any `## [` line is all
    /// preamble.
    pub fn load(text: &str) -> Self {
        let mut preamble = String::new();
        let mut raw_sections: Vec<String> = Vec::new();

        for line in text.split_inclusive('\n') {
            if line.starts_with(SECTION_MARKER) {
                raw_sections.push(line.to_string());
            } else if let Some(current) = raw_sections.last_mut() {
                current.push_str(line);
            } else {
                preamble.push_str(line);
            }
        }

        let sections: Vec<ChangelogSection> =
            raw_sections.into_iter().map(ChangelogSection::parse).collect();
        debug!(sections = sections.len(), "changelog loaded");

        ChangelogDocument { preamble, sections }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn sections(&self) -> &[ChangelogSection] {
        &self.sections
    }

    /// Section for the given version label, if present
    pub fn find(&self, label: &str) -> Option<&ChangelogSection> {
        self.sections.iter().find(|s| s.matches_version(label))
    }

    pub fn contains_version(&self, label: &str) -> bool {
        self.find(label).is_some()
    }

    /// Insert a section without disturbing existing ones.
    ///
    /// A versioned section lands immediately before the first version section,
    /// after a leading Unreleased section. An Unreleased section goes first;
    /// when one already exists it is amended instead.
    pub fn insert(mut self, section: ChangelogSection) -> Self {
        if section.is_unreleased() {
            if let Some(existing) = self.sections.iter_mut().find(|s| s.is_unreleased()) {
                debug!("amending existing unreleased section");
                existing.amend(section);
            } else {
                self.sections.insert(0, section);
            }
            return self;
        }

        let index = self
            .sections
            .iter()
            .take_while(|s| s.is_unreleased())
            .count();
        debug!(version = section.version_label(), index, "inserting changelog section");
        self.sections.insert(index, section);
        self
    }

    /// Serialize the document back to text
    pub fn render(&self) -> String {
        let mut out = self.preamble.clone();
        for section in &self.sections {
            if !out.is_empty() {
                if section.source.is_none() {
                    while !out.ends_with("\n\n") {
                        out.push('\n');
                    }
                } else if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            out.push_str(&section.render());
        }
        out
    }
}
