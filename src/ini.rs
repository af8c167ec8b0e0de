//! INI reading: turn config file text into a [`RawSource`].
//!
//! The accepted format is the common `configparser` dialect:
//!
//! ```text
//! # comment          ; also a comment
//! [server]
//! HOST = 0.0.0.0
//! PORT: 8080
//! MOTD = first line
//!     indented lines continue the previous value
//! ```
//!
//! Section and key lookups are case-insensitive. Values are kept as raw text
//! (only surrounding whitespace is removed); typing happens during validation.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::DoconfError;
use crate::schema::normalize;

/// One `key = value` entry, with the 1-based line it started on (0 when the
/// entry was inserted programmatically).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

/// One `[section]` of a raw source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSection {
    name: String,
    line: usize,
    entries: IndexMap<String, RawEntry>,
}

impl RawSection {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line of the section header (0 when built programmatically).
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, key: &str) -> Option<&RawEntry> {
        self.entries.get(&normalize(key))
    }

    pub fn entries(&self) -> impl Iterator<Item = &RawEntry> {
        self.entries.values()
    }
}

/// Section → key → raw string value, as read from a config file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSource {
    path: Option<std::path::PathBuf>,
    sections: IndexMap<String, RawSection>,
}

impl RawSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text. `path` is only used in error messages.
    pub fn parse(text: &str, path: Option<&Path>) -> Result<Self, DoconfError> {
        parse_ini(text, path)
    }

    /// Read and parse an INI file.
    pub fn read(path: &Path) -> Result<Self, DoconfError> {
        let text = std::fs::read_to_string(path).map_err(|e| DoconfError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse_ini(&text, Some(path))
    }

    /// Set `key` in `section`, creating the section if needed. Later values
    /// replace earlier ones.
    pub fn insert(&mut self, section: &str, key: &str, value: impl Into<String>) -> &mut Self {
        self.insert_at(section, 0, key, value.into(), 0);
        self
    }

    /// Add an empty section (a header with no entries).
    pub fn add_section(&mut self, section: &str) -> &mut Self {
        self.section_entry(section, 0);
        self
    }

    /// The file this source was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn section(&self, name: &str) -> Option<&RawSection> {
        self.sections.get(&normalize(name))
    }

    pub fn sections(&self) -> impl Iterator<Item = &RawSection> {
        self.sections.values()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn section_entry(&mut self, name: &str, line: usize) -> &mut RawSection {
        self.sections
            .entry(normalize(name))
            .or_insert_with(|| RawSection {
                name: name.trim().to_string(),
                line,
                entries: IndexMap::new(),
            })
    }

    fn insert_at(&mut self, section: &str, section_line: usize, key: &str, value: String, line: usize) {
        let key = key.trim();
        self.section_entry(section, section_line).entries.insert(
            normalize(key),
            RawEntry {
                key: key.to_string(),
                value,
                line,
            },
        );
    }
}

fn parse_ini(text: &str, path: Option<&Path>) -> Result<RawSource, DoconfError> {
    let mut source = RawSource {
        path: path.map(Path::to_path_buf),
        sections: IndexMap::new(),
    };
    let syntax_error = |line: usize, reason: &str| DoconfError::IniSyntax {
        path: path.map_or_else(|| "<text>".into(), Path::to_path_buf),
        line,
        reason: reason.to_string(),
    };

    let mut current_section: Option<String> = None;
    // (section key, entry key, indent of the entry line)
    let mut current_entry: Option<(String, String, usize)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        let indent = raw.len() - raw.trim_start().len();

        if let Some((section_key, entry_key, entry_indent)) = &current_entry
            && indent > *entry_indent
        {
            let entry = source
                .sections
                .get_mut(section_key)
                .and_then(|s| s.entries.get_mut(entry_key));
            if let Some(entry) = entry {
                if !entry.value.is_empty() {
                    entry.value.push('\n');
                }
                entry.value.push_str(trimmed);
            }
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            let header = header.trim();
            if header.is_empty() {
                return Err(syntax_error(line_no, "empty section header"));
            }
            source.section_entry(header, line_no);
            current_section = Some(header.to_string());
            current_entry = None;
            continue;
        }

        let Some(split_at) = trimmed.find(['=', ':']) else {
            return Err(syntax_error(line_no, "expected `[section]` or `key = value`"));
        };
        let (key, value) = (trimmed[..split_at].trim(), trimmed[split_at + 1..].trim());
        if key.is_empty() {
            return Err(syntax_error(line_no, "entry has an empty key"));
        }
        let Some(section) = current_section.as_deref() else {
            return Err(syntax_error(line_no, "entry appears before any `[section]` header"));
        };

        source.insert_at(section, line_no, key, value.to_string(), line_no);
        current_entry = Some((normalize(section), normalize(key), indent));
    }

    Ok(source)
}
