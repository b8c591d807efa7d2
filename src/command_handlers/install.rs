use crate::manager::Manager;
use anyhow::Result;

pub fn run_install(manager: &Manager, tool: &str, version: &str) -> Result<()> {
    let plugin = manager.registry().get(tool)?;
    println!("Installing {} {version}", plugin.display_name());
    println!("   from {}", plugin.resolve_download_url(version));
    let dir = manager.install(tool, version)?;
    println!("Installed {tool} {version} -> {}", dir.display());
    println!("Activate it with: arsenal use {tool} {version}");
    Ok(())
}
