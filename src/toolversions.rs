//! `.toolversions`: the versions a project wants, one `<tool> <version>` per
//! line.
//!
//! ```text
//! node 20.10.0
//! go 1.22.0
//! # comments and blank lines are ignored
//! ```

use crate::config::TOOL_VERSIONS_FILE;
use crate::error::{ArsenalError, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolVersions {
    /// tool -> version; the last line for a tool wins.
    pub tools: BTreeMap<String, String>,
}

impl ToolVersions {
    pub fn parse_str(content: &str, path: &Path) -> Result<Self> {
        let mut tools = BTreeMap::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            let [tool, version] = parts.as_slice() else {
                return Err(ArsenalError::ManifestParseError {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            tools.insert(tool.to_string(), version.to_string());
        }
        Ok(Self { tools })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)?;
        Self::parse_str(&content, path)
    }

    /// Renders the whole manifest; line order is not meaningful.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (tool, version) in &self.tools {
            let _ = writeln!(out, "{tool} {version}");
        }
        out
    }

    /// Rewrites `<dir>/.toolversions` from scratch.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(TOOL_VERSIONS_FILE);
        fs_err::write(&path, self.render())?;
        debug!("wrote {} ({} tools)", path.display(), self.tools.len());
        Ok(path)
    }

    #[cfg(test)]
    pub fn get(&self, tool: &str) -> Option<&str> {
        self.tools.get(tool).map(String::as_str)
    }

    pub fn set(&mut self, tool: &str, version: &str) {
        self.tools.insert(tool.to_string(), version.to_string());
    }
}

/// Nearest `.toolversions` in `dir` or any of its ancestors.
pub fn find_tool_versions(dir: &Path) -> Result<PathBuf> {
    let start = std::path::absolute(dir)?;
    let mut current: &Path = &start;
    loop {
        let candidate = current.join(TOOL_VERSIONS_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Err(ArsenalError::ManifestNotFound {
        file: TOOL_VERSIONS_FILE,
        start,
    })
}

pub fn read_tool_versions(dir: &Path) -> Result<(ToolVersions, PathBuf)> {
    let path = find_tool_versions(dir)?;
    let tv = ToolVersions::load(&path)?;
    Ok((tv, path))
}

/// Records `tool version` in `<dir>/.toolversions`, creating it if needed.
/// Only the file in `dir` itself is touched, never an ancestor's.
pub fn pin_local(dir: &Path, tool: &str, version: &str) -> Result<PathBuf> {
    let path = dir.join(TOOL_VERSIONS_FILE);
    let mut tv = if path.is_file() {
        ToolVersions::load(&path)?
    } else {
        ToolVersions::default()
    };
    tv.set(tool, version);
    tv.write(dir)
}
