//! Version manager: installs, activates and removes tool versions under the
//! arsenal root. Every operation works on the directories and pointers it
//! finds on disk; nothing is cached between calls.

mod doctor;
pub mod hooks;
mod lock;
mod remote;

pub use doctor::DiagReport;
pub use remote::RemoteVersion;

use crate::archive::extract_archive;
use crate::config::Paths;
use crate::download::Downloader;
use crate::error::{ArsenalError, Result};
use crate::platform::platform;
use crate::plugin::{PluginDescriptor, Registry};
use crate::toolversions::read_tool_versions;
use hooks::{HookContext, HookRunner};
use lock::ToolLock;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct Manager {
    paths: Paths,
    registry: Registry,
    downloader: Downloader,
    hooks: Box<dyn HookRunner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Downloaded and activated.
    Installed,
    /// Already installed and already active; nothing changed.
    AlreadyInstalled,
    /// Already installed; the pointer was switched to it.
    Activated,
    InstallFailed(String),
    UseFailed(String),
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::InstallFailed(_) | SyncOutcome::UseFailed(_))
    }
}

#[derive(Debug, Clone)]
pub struct SyncEntry {
    pub tool: String,
    pub version: String,
    pub outcome: SyncOutcome,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub manifest_path: PathBuf,
    pub entries: Vec<SyncEntry>,
}

impl SyncReport {
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_failure()).count()
    }
}

impl Manager {
    pub fn new(
        paths: Paths,
        registry: Registry,
        downloader: Downloader,
        hooks: Box<dyn HookRunner>,
    ) -> Self {
        Self {
            paths,
            registry,
            downloader,
            hooks,
        }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_installed(&self, tool: &str, version: &str) -> bool {
        check_names(tool, version).is_ok() && self.paths.tool_version_path(tool, version).is_dir()
    }

    /// Downloads and unpacks `tool` `version`. The new version is not
    /// activated. On any failure the version directory is removed again.
    pub fn install(&self, tool: &str, version: &str) -> Result<PathBuf> {
        check_names(tool, version)?;
        let plugin = self.registry.get(tool)?;
        let _lock = ToolLock::acquire(&self.paths, tool)?;

        let install_dir = self.paths.tool_version_path(tool, version);
        if install_dir.exists() {
            return Err(ArsenalError::AlreadyInstalled {
                tool: tool.to_string(),
                version: version.to_string(),
            });
        }
        fs_err::create_dir_all(&install_dir)?;

        match self.populate(plugin, tool, version, &install_dir) {
            Ok(()) => {
                info!("installed {tool} {version} into {}", install_dir.display());
                Ok(install_dir)
            }
            Err(e) => {
                warn!("install of {tool} {version} failed, rolling back: {e}");
                if let Err(rm) = fs_err::remove_dir_all(&install_dir) {
                    warn!("rollback incomplete: {rm}");
                }
                Err(e)
            }
        }
    }

    fn populate(
        &self,
        plugin: &PluginDescriptor,
        tool: &str,
        version: &str,
        install_dir: &Path,
    ) -> Result<()> {
        let format = plugin.resolve_archive_format()?;
        let url = plugin.resolve_download_url(version);
        let staged = self.downloader.fetch(&url)?;
        debug!("extracting {format} archive for {tool} {version}");
        extract_archive(staged.path(), install_dir, format)?;

        let ctx = HookContext {
            tool,
            version,
            install_dir,
            env: &plugin.env_vars,
        };
        for command in &plugin.post_install {
            self.hooks.run(command, &ctx)?;
        }
        Ok(())
    }

    /// Points `current/<tool>` at an installed version.
    pub fn use_version(&self, tool: &str, version: &str) -> Result<()> {
        check_names(tool, version)?;
        self.registry.get(tool)?;
        let _lock = ToolLock::acquire(&self.paths, tool)?;

        let target = self.paths.tool_version_path(tool, version);
        if !target.is_dir() {
            return Err(ArsenalError::NotInstalled {
                tool: tool.to_string(),
                version: version.to_string(),
            });
        }

        fs_err::create_dir_all(&self.paths.current)?;
        let pointer = self.paths.tool_current_path(tool);
        self.remove_pointer(&pointer)?;
        platform()
            .create_pointer(&pointer, &target)
            .map_err(|source| ArsenalError::LinkOperationFailed {
                path: pointer.clone(),
                source,
            })?;
        info!("{tool} now at {version}");
        Ok(())
    }

    /// Removes an installed version, deactivating it first if it is active.
    /// No other version is activated in its place.
    pub fn uninstall(&self, tool: &str, version: &str) -> Result<()> {
        check_names(tool, version)?;
        self.registry.get(tool)?;
        let _lock = ToolLock::acquire(&self.paths, tool)?;

        let dir = self.paths.tool_version_path(tool, version);
        if !dir.is_dir() {
            return Err(ArsenalError::NotInstalled {
                tool: tool.to_string(),
                version: version.to_string(),
            });
        }

        if self.current(tool) == version {
            self.remove_pointer(&self.paths.tool_current_path(tool))?;
            debug!("deactivated {tool} {version}");
        }
        fs_err::remove_dir_all(&dir)?;
        info!("removed {tool} {version}");
        Ok(())
    }

    fn remove_pointer(&self, pointer: &Path) -> Result<()> {
        match platform().remove_pointer(pointer) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ArsenalError::LinkOperationFailed {
                path: pointer.to_path_buf(),
                source,
            }),
        }
    }

    /// Installed versions of `tool`, sorted by name.
    pub fn list(&self, tool: &str) -> Result<Vec<String>> {
        self.registry.get(tool)?;
        let entries = match fs_err::read_dir(self.paths.versions.join(tool)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.path().is_dir() {
                versions.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Active version of `tool`, or "" when nothing valid is active.
    pub fn current(&self, tool: &str) -> String {
        active_version(&self.paths.tool_current_path(tool)).unwrap_or_default()
    }

    pub fn current_all(&self) -> Result<BTreeMap<String, String>> {
        let mut active = BTreeMap::new();
        let entries = match fs_err::read_dir(&self.paths.current) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(active),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if let Some(version) = active_version(&entry.path()) {
                active.insert(entry.file_name().to_string_lossy().into_owned(), version);
            }
        }
        Ok(active)
    }

    /// Installs and activates everything pinned in the nearest
    /// `.toolversions`. A failing entry is recorded and the rest continue.
    pub fn sync(&self, dir: &Path) -> Result<SyncReport> {
        let (manifest, manifest_path) = read_tool_versions(dir)?;
        info!(
            "syncing {} tools from {}",
            manifest.tools.len(),
            manifest_path.display()
        );
        let entries = manifest
            .tools
            .iter()
            .map(|(tool, version)| SyncEntry {
                tool: tool.clone(),
                version: version.clone(),
                outcome: self.sync_one(tool, version),
            })
            .collect();
        Ok(SyncReport {
            manifest_path,
            entries,
        })
    }

    fn sync_one(&self, tool: &str, version: &str) -> SyncOutcome {
        let freshly_installed = if self.is_installed(tool, version) {
            false
        } else {
            if let Err(e) = self.install(tool, version) {
                return SyncOutcome::InstallFailed(e.to_string());
            }
            true
        };
        if !freshly_installed && self.current(tool) == version {
            return SyncOutcome::AlreadyInstalled;
        }
        match self.use_version(tool, version) {
            Ok(()) if freshly_installed => SyncOutcome::Installed,
            Ok(()) => SyncOutcome::Activated,
            Err(e) => SyncOutcome::UseFailed(e.to_string()),
        }
    }
}

/// Tool and version names become single path components under the root.
fn check_name(kind: &'static str, name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if bad {
        return Err(ArsenalError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_names(tool: &str, version: &str) -> Result<()> {
    check_name("tool", tool)?;
    check_name("version", version)
}

/// Version name behind a pointer; None when missing, unreadable or dangling.
fn active_version(pointer: &Path) -> Option<String> {
    let target = platform().read_pointer(pointer)?;
    if !target.is_dir() {
        debug!("{} points at missing {}", pointer.display(), target.display());
        return None;
    }
    Some(target.file_name()?.to_string_lossy().into_owned())
}
