use crate::archive::ArchiveFormat;
use crate::platform::PlatformOps;
use std::io;
use std::path::{Path, PathBuf};

pub static UNIX_PLATFORM: Unix = Unix;

pub struct Unix;

impl PlatformOps for Unix {
    fn default_archive_format(&self) -> ArchiveFormat {
        ArchiveFormat::TarGz
    }
    fn create_pointer(&self, pointer: &Path, target: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, pointer)
    }
    fn read_pointer(&self, pointer: &Path) -> Option<PathBuf> {
        let target = std::fs::read_link(pointer).ok()?;
        if target.is_relative() {
            // relative links resolve against the directory holding the link
            return Some(pointer.parent()?.join(target));
        }
        Some(target)
    }
    fn remove_pointer(&self, pointer: &Path) -> io::Result<()> {
        std::fs::remove_file(pointer)
    }
    fn shell(&self) -> (&'static str, &'static str) {
        ("sh", "-c")
    }
}
