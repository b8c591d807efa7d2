use crate::config::Settings;
use crate::manager::Manager;
use anyhow::Result;
use std::cmp::Ordering;

pub fn run_uninstall(
    manager: &Manager,
    settings: &Settings,
    tool: &str,
    version: &str,
) -> Result<()> {
    let was_active = manager.current(tool) == version;
    manager.uninstall(tool, version)?;
    println!("Uninstalled {tool} {version}");

    let remaining = manager.list(tool)?;
    if was_active {
        match pick_fallback(&remaining) {
            Some(next) if settings.auto_fallback => {
                manager.use_version(tool, &next)?;
                println!("Switched {tool} to {next}");
            }
            Some(_) => println!("No active {tool} version (auto_fallback is off)"),
            None => println!("No {tool} versions left"),
        }
    }
    if !remaining.is_empty() {
        println!("Installed {tool} versions: {}", remaining.join(", "));
    }
    Ok(())
}

/// Tolerates a leading `v` and a missing patch component ("1.22" -> 1.22.0).
fn parse_loose(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.trim_start_matches('v');
    semver::Version::parse(trimmed)
        .or_else(|_| semver::Version::parse(&format!("{trimmed}.0")))
        .ok()
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_loose(a), parse_loose(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        // semver-looking names outrank arbitrary directory names
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Highest remaining version by semantic version order.
pub fn pick_fallback(remaining: &[String]) -> Option<String> {
    remaining
        .iter()
        .max_by(|a, b| compare_versions(a, b))
        .cloned()
}
