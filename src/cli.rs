use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "arsenal",
    about = "Arsenal: install and switch between versions of developer tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Arsenal root directory (defaults to $ARSENAL_ROOT, then ~/.arsenal)
    #[arg(long, global = true, env = "ARSENAL_ROOT")]
    pub root: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download and unpack a tool version (does not activate it).
    /// Examples:
    ///   arsenal install node 20.10.0
    ///   arsenal install go 1.22.0
    Install {
        tool: String,
        version: String,
    },
    /// Activate an installed version
    Use {
        tool: String,
        version: String,
        /// Also pin the version in ./.toolversions
        #[arg(long)]
        local: bool,
    },
    /// Remove an installed version
    Uninstall {
        tool: String,
        version: String,
    },
    /// List installed versions of a tool
    #[command(alias = "list")]
    Ls {
        tool: String,
    },
    /// List versions available upstream
    #[command(name = "ls-remote", alias = "list-remote")]
    LsRemote {
        tool: String,
        /// Number of versions to show (defaults to config.toml's default_list_limit)
        #[arg(short = 'n', long, conflicts_with = "all")]
        limit: Option<usize>,
        /// Show every published version
        #[arg(long)]
        all: bool,
        /// Only long-term-support releases
        #[arg(long)]
        lts_only: bool,
    },
    /// Show the active version of every tool
    Current,
    /// Install and activate everything pinned in the nearest .toolversions
    Sync,
    /// Check the arsenal installation for problems
    Doctor,
    /// Inspect tool descriptors
    Plugin {
        #[command(subcommand)]
        command: PluginCommands,
    },
    /// Print shell setup putting active tools on PATH.
    /// Usage: eval "$(arsenal init-shell bash)"
    #[command(name = "init-shell")]
    InitShell {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum PluginCommands {
    /// List known tools
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}
