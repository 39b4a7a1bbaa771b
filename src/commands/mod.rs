//! CLI command handlers.

mod auth;
mod config;
mod import;
mod playlist;
mod sync;

pub(crate) use auth::{run_auth_login_command, run_auth_logout_command};
pub(crate) use config::run_config_show_command;
pub(crate) use import::run_import_command;
pub(crate) use playlist::{run_create_command, run_delete_command, run_share_command};
pub(crate) use sync::{run_download_command, run_sync_command};
