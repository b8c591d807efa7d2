pub mod current;
pub mod dispatch;
pub mod doctor;
pub mod init_shell;
pub mod install;
pub mod list;
pub mod ls_remote;
pub mod plugin;
pub mod sync;
pub mod uninstall;
pub mod use_version;
