use crate::manager::{Manager, SyncOutcome};
use anyhow::{Context, Result};

pub fn run_sync(manager: &Manager) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let report = manager.sync(&cwd)?;
    println!("Syncing from {}", report.manifest_path.display());
    for entry in &report.entries {
        let status = match &entry.outcome {
            SyncOutcome::Installed => "installed and activated".to_string(),
            SyncOutcome::AlreadyInstalled => "already active".to_string(),
            SyncOutcome::Activated => "activated".to_string(),
            SyncOutcome::InstallFailed(msg) => format!("install failed: {msg}"),
            SyncOutcome::UseFailed(msg) => format!("activation failed: {msg}"),
        };
        println!("  {} {}: {status}", entry.tool, entry.version);
    }
    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!("{failures} of {} tools failed to sync", report.entries.len());
    }
    Ok(())
}
