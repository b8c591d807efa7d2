use crate::archive::ArchiveFormat;
use crate::platform::PlatformOps;
use std::io;
use std::path::{Path, PathBuf};

pub static WINDOWS_PLATFORM: Windows = Windows;

/// Symlinks need elevated rights on most Windows setups, so the active
/// pointer is a one-line file holding the absolute target path.
pub struct Windows;

impl PlatformOps for Windows {
    fn default_archive_format(&self) -> ArchiveFormat { ArchiveFormat::Zip }
    fn create_pointer(&self, pointer: &Path, target: &Path) -> io::Result<()> { std::fs::write(pointer, format!("{}\n", target.display())) }
    fn read_pointer(&self, pointer: &Path) -> Option<PathBuf> {
        if !pointer.is_file() { return None; }
        let raw = std::fs::read_to_string(pointer).ok()?;
        let line = raw.lines().next()?.trim();
        if line.is_empty() { None } else { Some(PathBuf::from(line)) }
    }
    fn remove_pointer(&self, pointer: &Path) -> io::Result<()> { std::fs::remove_file(pointer) }
    fn shell(&self) -> (&'static str, &'static str) { ("cmd", "/C") }
}
