//! Config command handler: show effective configuration.

use crate::app::settings::Settings;

pub(crate) fn run_config_show_command(settings: &Settings) {
    for line in config_lines(settings) {
        println!("{line}");
    }
}

fn config_lines(settings: &Settings) -> Vec<String> {
    let resolved_path = settings.config_path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    vec![
        format!("config_path = {resolved_path}"),
        format!(
            "config_file = {}",
            if settings.config_loaded {
                "loaded"
            } else {
                "not found (using defaults)"
            }
        ),
        format!("output_dir = {}", settings.output_dir.display()),
        format!("audio_quality = {}", settings.audio_quality.value()),
        format!("source = {}", settings.source),
        format!("concurrency = {}", settings.concurrency),
        format!("max_retries = {}", settings.max_retries),
        format!("lang = {}", settings.lang),
        format!("log_level = {}", settings.log_level),
        format!("ytdlp_path = {}", settings.ytdlp_path.display()),
        format!("token_file = {}", settings.token_file.display()),
        format!(
            "client_secrets_file = {}",
            settings.client_secrets_file.display()
        ),
        format!("api_timeout_secs = {}", settings.api_timeout.as_secs()),
    ]
}
