use crate::cli::{Commands, PluginCommands};
use crate::command_handlers::{
    current, doctor, init_shell, install, list, ls_remote, plugin, sync, uninstall, use_version,
};
use crate::config::Settings;
use crate::manager::Manager;
use anyhow::Result;

pub fn dispatch(cmd: Commands, manager: &Manager, settings: &Settings) -> Result<()> {
    match cmd {
        Commands::Install { tool, version } => install::run_install(manager, &tool, &version),
        Commands::Use {
            tool,
            version,
            local,
        } => use_version::run_use(manager, &tool, &version, local),
        Commands::Uninstall { tool, version } => {
            uninstall::run_uninstall(manager, settings, &tool, &version)
        }
        Commands::Ls { tool } => list::run_list(manager, &tool),
        Commands::LsRemote {
            tool,
            limit,
            all,
            lts_only,
        } => {
            let args = ls_remote::LsRemoteArgs {
                tool: &tool,
                limit: if all {
                    0
                } else {
                    limit.unwrap_or(settings.default_list_limit)
                },
                lts_only,
            };
            ls_remote::run_ls_remote(manager, args)
        }
        Commands::Current => current::run_current(manager),
        Commands::Sync => sync::run_sync(manager),
        Commands::Doctor => doctor::run_doctor(manager),
        Commands::Plugin { command } => match command {
            PluginCommands::List => plugin::list_plugins(manager),
        },
        Commands::InitShell { shell } => init_shell::print_init(manager, shell),
    }
}
