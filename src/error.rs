use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArsenalError {
    #[error("unknown tool: {name} (run 'arsenal plugin list' to see available tools)")]
    UnknownTool { name: String },

    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("{tool} {version} is already installed")]
    AlreadyInstalled { tool: String, version: String },

    #[error("{tool} {version} is not installed (run 'arsenal install {tool} {version}')")]
    NotInstalled { tool: String, version: String },

    #[error("download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("extracting {path} failed: {reason}")]
    ExtractFailed { path: PathBuf, reason: String },

    #[error("unsupported archive format: {format}")]
    UnsupportedArchiveFormat { format: String },

    #[error("unsupported list format: {format} (only json is supported)")]
    UnsupportedListFormat { format: String },

    #[error("invalid version_regex for {tool}: {reason}")]
    InvalidVersionPattern { tool: String, reason: String },

    #[error("{tool} does not provide a remote version listing")]
    ListingUnavailable { tool: String },

    #[error("{file} not found (searched from {start} up to the filesystem root)")]
    ManifestNotFound { file: &'static str, start: PathBuf },

    #[error("{path}:{line}: expected '<tool> <version>', got '{content}'")]
    ManifestParseError {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("link operation on {path} failed: {source}")]
    LinkOperationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("post-install command '{command}' failed: {reason}")]
    HookFailed { command: String, reason: String },

    #[error("building HTTP client failed: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("could not lock {path}: {reason}")]
    LockFailed { path: PathBuf, reason: String },

    #[error("parsing plugin descriptor {origin} failed: {source}")]
    PluginParse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("home directory not found (set ARSENAL_ROOT or pass --root)")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArsenalError>;

impl ArsenalError {
    pub(crate) fn extract(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::ExtractFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn download(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::DownloadFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
