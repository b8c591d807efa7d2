//! Plugin descriptors: what a tool is called, where its releases live and how
//! they are packaged. The manager only ever reads these.

mod builtin;

use crate::archive::ArchiveFormat;
use crate::config::Paths;
use crate::error::{ArsenalError, Result};
use crate::platform::platform;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Remote version listing endpoint.
    pub list_url: Option<String>,
    /// Only "json" is understood.
    pub list_format: Option<String>,
    /// URL template. Supports {{version}}, {{os}}, {{arch}}
    pub download_url: String,
    /// Binaries directory inside an installation, relative to its root.
    pub bin_path: Option<String>,
    /// "tar.gz", "tgz", "tar.xz" or "zip"; platform default when unset.
    pub archive_type: Option<String>,
    /// Stripped from remote listing entries, e.g. "v".
    pub version_prefix: Option<String>,
    /// Remote listing entries not matching this pattern are dropped.
    pub version_regex: Option<String>,
    pub os_map: HashMap<String, String>,
    pub arch_map: HashMap<String, String>,
    pub post_install: Vec<String>,
    pub env_vars: BTreeMap<String, String>,
}

impl PluginDescriptor {
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn resolve_download_url(&self, version: &str) -> String {
        self.resolve_download_url_for(version, detect_os(), detect_arch())
    }

    /// Remapping tables apply before substitution so a descriptor can rename
    /// e.g. `amd64` to the vendor's `x64`.
    pub fn resolve_download_url_for(&self, version: &str, os: &str, arch: &str) -> String {
        let os = self.os_map.get(os).map(String::as_str).unwrap_or(os);
        let arch = self.arch_map.get(arch).map(String::as_str).unwrap_or(arch);
        self.download_url
            .replace("{{version}}", version)
            .replace("{{os}}", os)
            .replace("{{arch}}", arch)
    }

    pub fn resolve_archive_format(&self) -> Result<ArchiveFormat> {
        match self.archive_type.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => tag.parse(),
            _ => Ok(platform().default_archive_format()),
        }
    }

    pub fn bin_dir(&self) -> &str {
        self.bin_path.as_deref().unwrap_or("bin")
    }
}

/// Host OS in Go naming (linux, darwin, windows).
pub fn detect_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Host architecture in Go naming (amd64, arm64, 386).
pub fn detect_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}

/// Known tools, keyed by name. User descriptors override built-ins.
#[derive(Debug, Default)]
pub struct Registry {
    plugins: HashMap<String, PluginDescriptor>,
}

impl Registry {
    pub fn load(paths: &Paths) -> Result<Self> {
        let mut registry = Self::default();
        for (origin, src) in builtin::BUILTIN_PLUGINS {
            registry.add(parse_descriptor(src, origin)?);
        }
        registry.load_dir(&paths.plugins)?;
        Ok(registry)
    }

    #[cfg(test)]
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = PluginDescriptor>) -> Self {
        let mut registry = Self::default();
        for d in descriptors {
            registry.add(d);
        }
        registry
    }

    fn load_dir(&mut self, dir: &Path) -> Result<()> {
        let entries = match fs_err::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let src = fs_err::read_to_string(&path)?;
            let descriptor = parse_descriptor(&src, &path.display().to_string())?;
            debug!("loaded user plugin {} from {}", descriptor.name, path.display());
            self.add(descriptor);
        }
        Ok(())
    }

    fn add(&mut self, descriptor: PluginDescriptor) {
        self.plugins.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Result<&PluginDescriptor> {
        self.plugins
            .get(name)
            .ok_or_else(|| ArsenalError::UnknownTool {
                name: name.to_string(),
            })
    }

    /// Sorted by tool name.
    pub fn all(&self) -> Vec<&PluginDescriptor> {
        let mut all: Vec<_> = self.plugins.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

fn parse_descriptor(src: &str, origin: &str) -> Result<PluginDescriptor> {
    toml::from_str(src).map_err(|source| ArsenalError::PluginParse {
        origin: origin.to_string(),
        source,
    })
}
