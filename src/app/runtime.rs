//! Process flow: parse arguments, load config, set up logging, dispatch.

use clap::Parser;
use playlist_core::i18n::{Lang, MessageKey, Messages};
use tracing::debug;

use crate::ProcessExit;
use crate::app::settings::Settings;
use crate::app::{command_dispatcher, config, terminal};
use crate::cli::Cli;

pub(crate) async fn run() -> ProcessExit {
    let cli = Cli::parse();
    let fallback = Messages::new(Lang::resolve(cli.global.lang, None));

    let loaded = match config::load_default_file_config() {
        Ok(loaded) => loaded,
        Err(error) => {
            print_error(fallback, &error);
            return ProcessExit::Failure;
        }
    };
    let settings = Settings::resolve(&cli.global, &loaded);
    let messages = Messages::new(settings.lang);

    terminal::init_tracing(
        settings.log_level,
        settings.force_cli_log_level,
        terminal::TerminalEnv::detect().color(cli.global.no_color),
    );
    debug!(command = ?cli.command, config_loaded = settings.config_loaded, "CLI arguments parsed");

    match command_dispatcher::dispatch(&cli.command, settings, cli.global.quiet).await {
        Ok(exit) => exit,
        Err(error) => {
            print_error(messages, &error);
            ProcessExit::Failure
        }
    }
}

fn print_error(messages: Messages, error: &anyhow::Error) {
    let detail = format!("{error:#}");
    eprintln!("{}", messages.render(MessageKey::Error, &[("error", &detail)]));
}
