//! `.murmurrc` file data structures
//!
//! The file uses the configparser INI dialect: `[section]` headers,
//! `key = value` (or `key: value`) entries with case-insensitive keys, comment
//! lines starting with `#` or `;`, and indented continuation lines that extend
//! the previous value with a newline.

use std::path::Path;

use crate::error::Result;

/// One `[section]` of an rc file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcSection {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl RcSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value, keeping the original key position
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning whether it was present
    pub fn remove(&mut self, key: &str) -> bool {
        let key = key.to_lowercase();
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed `.murmurrc` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcFile {
    sections: Vec<RcSection>,
}

impl RcFile {
    /// Load a document from disk. A missing file yields an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::config::read_failed(path, e.to_string()))?;
        Self::parse(&content).map_err(|reason| crate::error::config::read_failed(path, reason))
    }

    /// Parse document text
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut doc = Self::default();
        // (section index, key) of the value that continuation lines extend
        let mut current: Option<(usize, String)> = None;

        for (lineno, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(' ') || raw.starts_with('\t');
            if indented {
                if let Some((section_idx, key)) = &current {
                    let section = &mut doc.sections[*section_idx];
                    let value = match section.get(key) {
                        Some(existing) if !existing.is_empty() => format!("{existing}\n{trimmed}"),
                        _ => trimmed.to_string(),
                    };
                    section.set(key, value);
                    continue;
                }
            }

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                doc.section_mut_or_insert(name.trim());
                current = None;
                continue;
            }

            let Some(split_at) = trimmed.find(['=', ':']) else {
                return Err(format!("line {}: expected 'key = value'", lineno + 1));
            };
            let Some(section_idx) = doc.sections.len().checked_sub(1) else {
                return Err(format!("line {}: entry before any section header", lineno + 1));
            };
            let key = trimmed[..split_at].trim().to_lowercase();
            let value = trimmed[split_at + 1..].trim();
            doc.sections[section_idx].set(&key, value);
            current = Some((section_idx, key));
        }

        Ok(doc)
    }

    /// Write the document to disk, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::error::config::write_failed(path, e))?;
            }
        }
        std::fs::write(path, self.render())
            .map_err(|e| crate::error::config::write_failed(path, e))
    }

    /// Render document text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("[{}]\n", section.name));
            for (key, value) in section.entries() {
                let mut lines = value.split('\n');
                out.push_str(&format!("{key} = {}\n", lines.next().unwrap_or_default()));
                for line in lines {
                    out.push_str(&format!("\t{line}\n"));
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn section(&self, name: &str) -> Option<&RcSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Mutable access to a section, appending an empty one if absent
    pub fn section_mut_or_insert(&mut self, name: &str) -> &mut RcSection {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(RcSection::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Look up `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }
}
