use crate::manager::{DiagReport, Manager};
use anyhow::Result;

pub fn run_doctor(manager: &Manager) -> Result<()> {
    let search_path = std::env::var("PATH").unwrap_or_default();
    let results = manager.doctor(&search_path);
    for r in &results {
        let tag = format!("[{}]", r.status);
        println!("{tag:<7} {}: {}", r.name, r.message);
    }
    if results.has_errors() {
        anyhow::bail!("doctor found problems");
    }
    if !results.has_warnings() {
        println!("All checks passed");
    }
    Ok(())
}
