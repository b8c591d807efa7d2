pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

use crate::archive::ArchiveFormat;
use std::io;
use std::path::{Path, PathBuf};

/// OS-specific pieces of activation and installation.
pub trait PlatformOps: Sync + Send {
    /// Format assumed when a descriptor leaves `archive_type` empty.
    fn default_archive_format(&self) -> ArchiveFormat;
    /// Point `pointer` at `target`. Any previous pointer must be removed first.
    fn create_pointer(&self, pointer: &Path, target: &Path) -> io::Result<()>;
    /// Target recorded in `pointer`, or None if it is missing or not a pointer.
    fn read_pointer(&self, pointer: &Path) -> Option<PathBuf>;
    fn remove_pointer(&self, pointer: &Path) -> io::Result<()>;
    /// Program and flag used to run one post-install command line.
    fn shell(&self) -> (&'static str, &'static str);
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;
