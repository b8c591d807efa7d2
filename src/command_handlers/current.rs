use crate::manager::Manager;
use anyhow::Result;

pub fn run_current(manager: &Manager) -> Result<()> {
    let active = manager.current_all()?;
    if active.is_empty() {
        println!("No active tools");
        return Ok(());
    }
    let width = active.keys().map(String::len).max().unwrap_or(0);
    for (tool, version) in &active {
        println!("{tool:<width$}  {version}");
    }
    Ok(())
}
