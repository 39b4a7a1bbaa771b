//! CLI command routing: builds the run context and runs the chosen handler.

use anyhow::Result;

use crate::app::context::RunContext;
use crate::app::settings::Settings;
use crate::cli::{AuthCommand, Command, ConfigCommand};
use crate::{ProcessExit, commands};

/// Runs `command` and returns the exit outcome.
pub(crate) async fn dispatch(command: &Command, settings: Settings, quiet: bool) -> Result<ProcessExit> {
    let settings = match command {
        Command::Download(args) => settings.with_output(&args.output),
        Command::Sync(args) => settings.with_output(&args.output),
        Command::Import(args) => settings.with_output(&args.output),
        _ => settings,
    };
    let ctx = RunContext::new(settings, quiet);

    match command {
        Command::Create(args) => commands::run_create_command(&ctx, args).await?,
        Command::Delete(args) => commands::run_delete_command(&ctx, args).await?,
        Command::Share(args) => commands::run_share_command(&ctx, args).await?,
        Command::Download(args) => return commands::run_download_command(&ctx, args).await,
        Command::Sync(args) => return commands::run_sync_command(&ctx, args).await,
        Command::Import(args) => return commands::run_import_command(&ctx, args).await,
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::run_config_show_command(&ctx.settings),
        },
        Command::Auth { command } => match command {
            AuthCommand::Login => commands::run_auth_login_command(&ctx).await?,
            AuthCommand::Logout => commands::run_auth_logout_command(&ctx)?,
        },
    }

    Ok(ProcessExit::Success)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app::config::LoadedConfig;
    use crate::cli::GlobalArgs;

    #[tokio::test]
    async fn test_dispatch_config_show_succeeds() {
        let settings = Settings::resolve(&GlobalArgs::default(), &LoadedConfig::default());
        let command = Command::Config {
            command: ConfigCommand::Show,
        };
        let exit = dispatch(&command, settings, true).await.unwrap();
        assert_eq!(exit, ProcessExit::Success);
    }
}
