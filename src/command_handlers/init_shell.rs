use crate::cli::Shell;
use crate::manager::Manager;
use anyhow::Result;
use std::fmt::Write as _;

// Pointers under current/ never move, so a static PATH stays valid across
// `arsenal use` switches. Only active tools get their env vars exported.
pub fn print_init(manager: &Manager, shell: Shell) -> Result<()> {
    let current = &manager.paths().current;
    let active = manager.current_all()?;

    let mut bin_dirs = Vec::new();
    let mut env = Vec::new();
    for plugin in manager.registry().all() {
        let pointer = current.join(&plugin.name);
        let bin = match plugin.bin_dir() {
            "" => pointer.clone(),
            rel => pointer.join(rel),
        };
        bin_dirs.push(bin.display().to_string());
        if let Some(version) = active.get(&plugin.name) {
            let dir = pointer.display().to_string();
            for (key, value) in &plugin.env_vars {
                let value = value
                    .replace("{{install_dir}}", &dir)
                    .replace("{{version}}", version);
                env.push((key.clone(), value));
            }
        }
    }
    print!("{}", render(shell, &bin_dirs, &env));
    Ok(())
}

fn render(shell: Shell, bin_dirs: &[String], env: &[(String, String)]) -> String {
    let mut out = String::from("# arsenal shell setup\n");
    match shell {
        Shell::Bash | Shell::Zsh => {
            // prepend in reverse so the first tool ends up first on PATH
            for dir in bin_dirs.iter().rev() {
                let _ = writeln!(
                    out,
                    "case \":$PATH:\" in *\":{dir}:\"*) ;; *) PATH=\"{dir}:$PATH\" ;; esac"
                );
            }
            out.push_str("export PATH\n");
            for (key, value) in env {
                let _ = writeln!(out, "export {key}=\"{value}\"");
            }
        }
        Shell::Fish => {
            for dir in bin_dirs.iter().rev() {
                let _ = writeln!(
                    out,
                    "contains -- \"{dir}\" $PATH; or set -gx PATH \"{dir}\" $PATH"
                );
            }
            for (key, value) in env {
                let _ = writeln!(out, "set -gx {key} \"{value}\"");
            }
        }
    }
    out
}
