use crate::manager::Manager;
use crate::toolversions::pin_local;
use anyhow::{Context, Result};

pub fn run_use(manager: &Manager, tool: &str, version: &str, local: bool) -> Result<()> {
    manager.use_version(tool, version)?;
    println!("Now using {tool} {version}");
    if local {
        let cwd = std::env::current_dir().context("resolving current directory")?;
        let path = pin_local(&cwd, tool, version)?;
        println!("Pinned {tool} {version} in {}", path.display());
    }
    Ok(())
}
