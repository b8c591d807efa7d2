use crate::manager::Manager;
use anyhow::Result;

pub fn run_list(manager: &Manager, tool: &str) -> Result<()> {
    let versions = manager.list(tool)?;
    if versions.is_empty() {
        println!("No {tool} versions installed");
        return Ok(());
    }
    let active = manager.current(tool);
    for version in versions {
        let marker = if version == active { "*" } else { " " };
        println!("{marker} {version}");
    }
    Ok(())
}
