use crate::error::{ArsenalError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_DIR: &str = ".arsenal";
pub const TOOL_VERSIONS_FILE: &str = ".toolversions";
pub const CONFIG_FILE: &str = "config.toml";
pub const ROOT_ENV: &str = "ARSENAL_ROOT";

/// Directory layout under the arsenal root.
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub versions: PathBuf,
    pub current: PathBuf,
    pub plugins: PathBuf,
    pub config: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            versions: root.join("versions"),
            current: root.join("current"),
            plugins: root.join("plugins"),
            config: root.join(CONFIG_FILE),
            root,
        }
    }

    /// Priority: explicit flag > $ARSENAL_ROOT > ~/.arsenal
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }
        if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(root)));
        }
        let home = dirs::home_dir().ok_or(ArsenalError::HomeNotFound)?;
        Ok(Self::new(home.join(APP_DIR)))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.root, &self.versions, &self.current, &self.plugins] {
            fs_err::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// e.g. ~/.arsenal/versions/node/20.10.0
    pub fn tool_version_path(&self, tool: &str, version: &str) -> PathBuf {
        self.versions.join(tool).join(version)
    }

    /// e.g. ~/.arsenal/current/node
    pub fn tool_current_path(&self, tool: &str) -> PathBuf {
        self.current.join(tool)
    }

    pub fn tool_lock_path(&self, tool: &str) -> PathBuf {
        self.versions.join(format!(".{tool}.lock"))
    }
}

/// Global settings read from `<root>/config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows shown by `ls-remote` when no limit is given.
    pub default_list_limit: usize,
    /// Re-activate a remaining version after uninstalling the active one.
    pub auto_fallback: bool,
    /// Suppress the download progress bar.
    pub quiet_downloads: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_list_limit: 20,
            auto_fallback: true,
            quiet_downloads: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = fs_err::read_to_string(path)?;
        let settings = toml::from_str(&data)
            .map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?;
        Ok(settings)
    }
}
