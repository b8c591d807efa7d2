use crate::manager::Manager;
use anyhow::Result;

pub fn list_plugins(manager: &Manager) -> Result<()> {
    for p in manager.registry().all() {
        println!("{:<8} {}", p.name, p.display_name());
        if !p.description.is_empty() {
            println!("         {}", p.description);
        }
        for (key, value) in &p.env_vars {
            println!("         env {key}={value}");
        }
    }
    Ok(())
}
