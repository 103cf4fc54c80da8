//! The generated `__init__.py` importing every installed artifact

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::normalize_name;

pub const AGGREGATION_FILE: &str = "__init__.py";

/// Import aggregation file inside the artifacts directory
#[derive(Debug, Clone)]
pub struct ImportAggregation {
    path: PathBuf,
}

impl ImportAggregation {
    pub fn in_dir(artifacts_dir: &Path) -> Self {
        Self {
            path: artifacts_dir.join(AGGREGATION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `from .<name>.main import <name>`
    pub fn import_line(name: &str) -> String {
        let module = normalize_name(name);
        format!("from .{module}.main import {module}")
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path).map(Some).map_err(|e| {
            crate::error::fs::operation_failed(
                format!("Failed to read {}", self.path.display()),
                None,
                e,
            )
        })
    }

    fn write(&self, content: &str) -> Result<()> {
        std::fs::write(&self.path, content).map_err(|e| {
            crate::error::fs::operation_failed(
                "Failed to update artifact imports",
                Some(self.path.display().to_string()),
                e,
            )
        })
    }

    /// Append the import for `name` unless that exact line is present.
    ///
    /// Returns whether the file changed.
    pub fn add(&self, name: &str) -> Result<bool> {
        let line = Self::import_line(name);
        let Some(mut content) = self.read()? else {
            self.write(&format!("{line}\n"))?;
            return Ok(true);
        };

        if content.lines().any(|existing| existing.trim_end() == line) {
            return Ok(false);
        }
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&line);
        content.push('\n');
        self.write(&content)?;
        Ok(true)
    }

    /// Drop every import of `name`'s package. Returns the number of lines removed.
    pub fn remove(&self, name: &str) -> Result<usize> {
        let Some(content) = self.read()? else {
            return Ok(0);
        };
        let prefix = format!("from .{}.", normalize_name(name));

        let mut removed = 0;
        let mut kept = String::with_capacity(content.len());
        for line in content.lines() {
            if line.trim().starts_with(&prefix) {
                removed += 1;
            } else {
                kept.push_str(line);
                kept.push('\n');
            }
        }
        if removed > 0 {
            self.write(&kept)?;
        }
        Ok(removed)
    }
}
