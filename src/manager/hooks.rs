//! Post-install commands declared by a descriptor.

use crate::error::{ArsenalError, Result};
use crate::platform::platform;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tracing::info;

pub struct HookContext<'a> {
    pub tool: &'a str,
    pub version: &'a str,
    pub install_dir: &'a Path,
    /// Descriptor `env_vars`, still holding `{{install_dir}}`/`{{version}}`.
    pub env: &'a BTreeMap<String, String>,
}

impl HookContext<'_> {
    pub fn expanded_env(&self) -> Vec<(String, String)> {
        let dir = self.install_dir.display().to_string();
        let mut env: Vec<(String, String)> = self
            .env
            .iter()
            .map(|(k, v)| {
                let v = v
                    .replace("{{install_dir}}", &dir)
                    .replace("{{version}}", self.version);
                (k.clone(), v)
            })
            .collect();
        env.push(("ARSENAL_TOOL".into(), self.tool.to_string()));
        env.push(("ARSENAL_VERSION".into(), self.version.to_string()));
        env.push(("ARSENAL_INSTALL_DIR".into(), dir));
        env
    }
}

/// Capability to run one post-install command line.
pub trait HookRunner {
    fn run(&self, command: &str, ctx: &HookContext<'_>) -> Result<()>;
}

/// Runs hooks through the platform shell inside the install directory.
pub struct ShellHookRunner;

impl HookRunner for ShellHookRunner {
    fn run(&self, command: &str, ctx: &HookContext<'_>) -> Result<()> {
        let (shell, flag) = platform().shell();
        info!("post-install for {} {}: {command}", ctx.tool, ctx.version);
        let status = Command::new(shell)
            .arg(flag)
            .arg(command)
            .current_dir(ctx.install_dir)
            .envs(ctx.expanded_env())
            .status()
            .map_err(|e| ArsenalError::HookFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(ArsenalError::HookFailed {
                command: command.to_string(),
                reason: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}
