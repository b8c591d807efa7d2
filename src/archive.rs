//! Archive extraction for downloaded tool releases.
//!
//! Release archives usually wrap everything in one versioned folder
//! (`node-v20.10.0-linux-x64/bin/node`). That folder is detected from the
//! first entry carrying a path separator and stripped, so installations are
//! laid out identically whatever the archive format.

use crate::error::{ArsenalError, Result};
use std::fmt;
use fs_err::{self as fs, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive (.tar.gz, .tgz)
    TarGz,
    /// XZ-compressed tar archive (.tar.xz)
    TarXz,
    Zip,
}

impl FromStr for ArchiveFormat {
    type Err = ArsenalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            "tar.xz" | "txz" => Ok(Self::TarXz),
            "zip" => Ok(Self::Zip),
            other => Err(ArsenalError::UnsupportedArchiveFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
            Self::Zip => "zip",
        })
    }
}

/// Extracts `archive_path` into `dest_dir`, which must already exist.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path, format: ArchiveFormat) -> Result<()> {
    info!(
        "extracting {format} archive {} into {}",
        archive_path.display(),
        dest_dir.display()
    );
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let res = match format {
        ArchiveFormat::TarGz => extract_tar(flate2::read::GzDecoder::new(reader), dest_dir),
        ArchiveFormat::TarXz => extract_tar(xz2::read::XzDecoder::new(reader), dest_dir),
        ArchiveFormat::Zip => extract_zip(archive_path, dest_dir),
    };
    res.map_err(|e| match e {
        ArsenalError::Io(io) => ArsenalError::extract(archive_path, io),
        other => other,
    })
}

/// Tracks the wrapper folder found on the first entry that has one.
#[derive(Default)]
struct PrefixStripper {
    prefix: Option<String>,
}

impl PrefixStripper {
    /// Returns the entry name relative to the install root, or None when the
    /// entry is the wrapper folder itself.
    fn strip(&mut self, raw: &str, is_dir: bool) -> Option<String> {
        let mut name = raw.replace('\\', "/");
        if is_dir && !name.ends_with('/') {
            name.push('/');
        }
        if self.prefix.is_none() {
            if let Some((top, _)) = name.split_once('/') {
                self.prefix = Some(format!("{top}/"));
            }
        }
        let stripped = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str()).unwrap_or(&name),
            None => &name,
        };
        let stripped = stripped.trim_end_matches('/');
        if stripped.is_empty() || stripped == "." {
            None
        } else {
            Some(stripped.to_string())
        }
    }
}

fn extract_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    let mut stripper = PrefixStripper::default();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_type = entry.header().entry_type();
        let raw = entry.path()?.to_string_lossy().into_owned();
        let Some(name) = stripper.strip(&raw, entry_type.is_dir()) else {
            continue;
        };
        let target = dest_dir.join(&name);

        if entry_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mode = entry.header().mode().unwrap_or(0o644);
            write_file(&target, mode, &mut entry)?;
        } else if entry_type.is_symlink() {
            let Some(link) = entry.link_name()? else {
                debug!("symlink entry {raw} has no target, skipping");
                continue;
            };
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let _ = fs::remove_file(&target);
            create_symlink(&link, &target)?;
        } else {
            debug!("skipping {raw} ({entry_type:?})");
        }
    }

    debug!("tar extraction complete");
    Ok(())
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ArsenalError::extract(archive_path, e))?;
    let mut stripper = PrefixStripper::default();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ArsenalError::extract(archive_path, e))?;
        let raw = match entry.enclosed_name() {
            Some(path) => path.to_string_lossy().into_owned(),
            None => {
                return Err(ArsenalError::extract(
                    archive_path,
                    format!("unsafe entry name {}", entry.name()),
                ))
            }
        };
        let Some(name) = stripper.strip(&raw, entry.is_dir()) else {
            continue;
        };
        let target = dest_dir.join(&name);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mode = entry.unix_mode().unwrap_or(0o644);
        write_file(&target, mode, &mut entry)?;
    }

    debug!("zip extraction complete");
    Ok(())
}

fn write_file<R: Read>(path: &Path, mode: u32, contents: &mut R) -> io::Result<()> {
    let mut out = File::create(path)?;
    io::copy(contents, &mut out)?;
    drop(out);
    set_mode(path, mode)
}

// Applied after writing so the result does not depend on the umask.
#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn create_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link, target)
}

#[cfg(windows)]
fn create_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(link, target)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    pub(crate) enum Item<'a> {
        Dir(&'a str),
        File(&'a str, &'a [u8], u32),
        Link(&'a str, &'a str),
    }

    pub(crate) fn write_tar_gz(path: &Path, items: &[Item]) {
        let file = File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_items(&mut builder, items);
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn append_items<W: Write>(builder: &mut tar::Builder<W>, items: &[Item]) {
        for item in items {
            let mut header = tar::Header::new_gnu();
            match item {
                Item::Dir(name) => {
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_mode(0o755);
                    header.set_size(0);
                    builder.append_data(&mut header, name, io::empty()).unwrap();
                }
                Item::File(name, data, mode) => {
                    header.set_entry_type(tar::EntryType::Regular);
                    header.set_mode(*mode);
                    header.set_size(data.len() as u64);
                    builder.append_data(&mut header, name, *data).unwrap();
                }
                Item::Link(name, target) => {
                    header.set_entry_type(tar::EntryType::Symlink);
                    header.set_mode(0o777);
                    header.set_size(0);
                    builder.append_link(&mut header, name, target).unwrap();
                }
            }
        }
    }

    fn write_zip(path: &Path, items: &[Item]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for item in items {
            match item {
                Item::Dir(name) => {
                    zip.add_directory(*name, zip::write::FileOptions::default())
                        .unwrap();
                }
                Item::File(name, data, mode) => {
                    let options = zip::write::FileOptions::default()
                        .compression_method(zip::CompressionMethod::Stored)
                        .unix_permissions(*mode);
                    zip.start_file(*name, options).unwrap();
                    zip.write_all(data).unwrap();
                }
                Item::Link(..) => unreachable!("zip fixtures carry no links"),
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn tar_gz_strips_wrapper_directory() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("pkg.tar.gz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_tar_gz(
            &archive,
            &[
                Item::Dir("pkg/"),
                Item::Dir("pkg/bin/"),
                Item::File("pkg/bin/tool", b"#!/bin/sh\necho hi\n", 0o755),
                Item::File("pkg/README", b"readme", 0o644),
            ],
        );

        extract_archive(&archive, &dest, ArchiveFormat::TarGz).unwrap();

        assert!(dest.join("bin/tool").is_file());
        assert_eq!(fs::read_to_string(dest.join("README")).unwrap(), "readme");
        assert!(!dest.join("pkg").exists());
        let entries: Vec<_> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 2, "unexpected entries: {entries:?}");
    }

    #[test]
    fn tar_gz_without_wrapper_extracts_in_place() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("flat.tar.gz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_tar_gz(&archive, &[Item::File("tool", b"bin", 0o755)]);

        extract_archive(&archive, &dest, ArchiveFormat::TarGz).unwrap();

        assert_eq!(fs::read(dest.join("tool")).unwrap(), b"bin");
    }

    #[cfg(unix)]
    #[test]
    fn tar_gz_preserves_mode_and_symlinks() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("pkg.tar.gz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_tar_gz(
            &archive,
            &[
                Item::Dir("node-v20/"),
                Item::File("node-v20/bin/node", b"ELF", 0o755),
                Item::Link("node-v20/bin/npm", "../lib/npm-cli.js"),
            ],
        );

        extract_archive(&archive, &dest, ArchiveFormat::TarGz).unwrap();

        let mode = fs::metadata(dest.join("bin/node")).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
        assert_eq!(
            fs::read_link(dest.join("bin/npm")).unwrap(),
            Path::new("../lib/npm-cli.js")
        );
    }

    #[cfg(unix)]
    #[test]
    fn tar_symlink_replaces_earlier_file() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("pkg.tar.gz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_tar_gz(
            &archive,
            &[
                Item::File("pkg/bin/npm", b"stale copy", 0o644),
                Item::Link("pkg/bin/npm", "npm-cli.js"),
            ],
        );

        extract_archive(&archive, &dest, ArchiveFormat::TarGz).unwrap();

        let npm = dest.join("bin/npm");
        assert!(fs::symlink_metadata(&npm).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&npm).unwrap(), Path::new("npm-cli.js"));
    }

    #[cfg(unix)]
    #[test]
    fn empty_file_keeps_zero_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("pkg.tar.gz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_tar_gz(&archive, &[Item::File("pkg/.keep", b"", 0o000)]);

        extract_archive(&archive, &dest, ArchiveFormat::TarGz).unwrap();

        let meta = fs::metadata(dest.join(".keep")).unwrap();
        assert_eq!(meta.len(), 0);
        assert_eq!(meta.permissions().mode() & 0o777, 0);
    }

    #[test]
    fn tar_xz_strips_wrapper_directory() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("zig.tar.xz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        {
            let file = File::create(&archive).unwrap();
            let encoder = xz2::write::XzEncoder::new(file, 6);
            let mut builder = tar::Builder::new(encoder);
            append_items(
                &mut builder,
                &[Item::File("zig-linux-x86_64-0.11.0/zig", b"zig", 0o755)],
            );
            builder.into_inner().unwrap().finish().unwrap();
        }

        extract_archive(&archive, &dest, ArchiveFormat::TarXz).unwrap();

        assert_eq!(fs::read(dest.join("zig")).unwrap(), b"zig");
    }

    #[test]
    fn zip_strips_wrapper_directory_like_tar() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("pkg.zip");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_zip(
            &archive,
            &[
                Item::Dir("pkg/"),
                Item::File("pkg/bin/tool.exe", b"MZ", 0o755),
                Item::File("pkg/LICENSE", b"MIT", 0o644),
            ],
        );

        extract_archive(&archive, &dest, ArchiveFormat::Zip).unwrap();

        assert_eq!(fs::read(dest.join("bin/tool.exe")).unwrap(), b"MZ");
        assert_eq!(fs::read(dest.join("LICENSE")).unwrap(), b"MIT");
        assert!(!dest.join("pkg").exists());
    }

    #[cfg(unix)]
    #[test]
    fn zip_preserves_unix_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("pkg.zip");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_zip(
            &archive,
            &[
                Item::File("pkg/bin/deno", b"ELF", 0o750),
                Item::File("pkg/config.json", b"{}", 0o600),
            ],
        );

        extract_archive(&archive, &dest, ArchiveFormat::Zip).unwrap();

        let mode = |rel: &str| fs::metadata(dest.join(rel)).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode("bin/deno"), 0o750);
        assert_eq!(mode("config.json"), 0o600);
    }

    #[test]
    fn zip_without_wrapper_extracts_in_place() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("deno.zip");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        write_zip(&archive, &[Item::File("deno", b"deno", 0o755)]);

        extract_archive(&archive, &dest, ArchiveFormat::Zip).unwrap();

        assert_eq!(fs::read(dest.join("deno")).unwrap(), b"deno");
    }

    #[test]
    fn corrupt_archive_is_extract_failure() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("broken.tar.gz");
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(&archive, b"definitely not gzip").unwrap();

        let err = extract_archive(&archive, &dest, ArchiveFormat::TarGz).unwrap_err();
        assert!(matches!(err, ArsenalError::ExtractFailed { .. }), "{err}");

        let err = extract_archive(&archive, &dest, ArchiveFormat::Zip).unwrap_err();
        assert!(matches!(err, ArsenalError::ExtractFailed { .. }), "{err}");
    }

    #[test]
    fn format_tags_parse() {
        assert_eq!("tar.gz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert_eq!("tgz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert_eq!("tar.xz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarXz);
        assert_eq!("ZIP".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
        assert!("7z".parse::<ArchiveFormat>().is_err());
    }

    #[test]
    fn stripper_skips_wrapper_entry() {
        let mut s = PrefixStripper::default();
        assert_eq!(s.strip("pkg/", true), None);
        assert_eq!(s.strip("pkg/bin/x", false).as_deref(), Some("bin/x"));
        assert_eq!(s.strip("./", true), None);

        let mut dir_without_slash = PrefixStripper::default();
        assert_eq!(dir_without_slash.strip("pkg", true), None);
        assert_eq!(
            dir_without_slash.strip("pkg/lib/a.js", false).as_deref(),
            Some("lib/a.js")
        );
    }
}
