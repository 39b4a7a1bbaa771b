//! Effective settings: CLI values, then config file values, then defaults.

use std::path::PathBuf;
use std::time::Duration;

use playlist_core::i18n::Lang;
use playlist_core::source::SourceKind;
use playlist_core::youtube::DEFAULT_API_TIMEOUT_SECS;
use playlist_core::ytdlp::{AudioQuality, DEFAULT_PROGRAM};
use playlist_core::{DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES};

use crate::app::config::{FileConfig, LoadedConfig, VerbositySetting, resolve_config_dir};
use crate::cli::{GlobalArgs, OutputArgs};

/// Output directory when neither the CLI nor the config names one.
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "downloads";

const TOKEN_FILE_NAME: &str = "token.json";
const CLIENT_SECRETS_FILE_NAME: &str = "client_secret.json";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) lang: Lang,
    pub(crate) source: SourceKind,
    pub(crate) concurrency: usize,
    pub(crate) max_retries: u32,
    pub(crate) output_dir: PathBuf,
    pub(crate) audio_quality: AudioQuality,
    pub(crate) token_file: PathBuf,
    pub(crate) client_secrets_file: PathBuf,
    pub(crate) ytdlp_path: PathBuf,
    pub(crate) api_timeout: Duration,
    pub(crate) log_level: &'static str,
    /// `-v`/`-q` given explicitly, overriding `RUST_LOG`.
    pub(crate) force_cli_log_level: bool,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) config_loaded: bool,
}

impl Settings {
    pub(crate) fn resolve(global: &GlobalArgs, loaded: &LoadedConfig) -> Self {
        let file = loaded.file();
        let credentials_dir = resolve_config_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            lang: Lang::resolve(global.lang, file.lang),
            source: global.source.or(file.source).unwrap_or_default(),
            concurrency: global
                .concurrency
                .or(file.concurrency)
                .map_or(DEFAULT_CONCURRENCY, usize::from),
            max_retries: global
                .max_retries
                .or(file.max_retries)
                .map_or(DEFAULT_MAX_RETRIES, u32::from),
            output_dir: file
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            audio_quality: file.audio_quality.unwrap_or_default(),
            token_file: file
                .token_file
                .clone()
                .unwrap_or_else(|| credentials_dir.join(TOKEN_FILE_NAME)),
            client_secrets_file: file
                .client_secrets_file
                .clone()
                .unwrap_or_else(|| credentials_dir.join(CLIENT_SECRETS_FILE_NAME)),
            ytdlp_path: file
                .ytdlp_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
            api_timeout: Duration::from_secs(
                file.api_timeout_secs.unwrap_or(DEFAULT_API_TIMEOUT_SECS),
            ),
            log_level: resolve_log_level(global, &file),
            force_cli_log_level: global.verbose > 0 || global.quiet,
            config_path: loaded.path.clone(),
            config_loaded: loaded.loaded_from_file(),
        }
    }

    /// Applies a command's `-o` / `--quality` overrides.
    pub(crate) fn with_output(mut self, output: &OutputArgs) -> Self {
        if let Some(dir) = &output.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(quality) = output.quality {
            self.audio_quality = quality;
        }
        self
    }
}

/// Log level from flags, then config verbosity. User-facing results go to
/// stdout, so the default only shows warnings.
pub(crate) fn resolve_log_level(global: &GlobalArgs, file: &FileConfig) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 => {}
        1 => return "info",
        2 => return "debug",
        _ => return "trace",
    }
    match file.verbosity {
        Some(VerbositySetting::Quiet) => "error",
        Some(VerbositySetting::Verbose) => "info",
        Some(VerbositySetting::Debug) => "debug",
        Some(VerbositySetting::Default) | None => "warn",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn loaded(config: FileConfig) -> LoadedConfig {
        LoadedConfig {
            path: Some(PathBuf::from("/cfg/config.toml")),
            config: Some(config),
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(&GlobalArgs::default(), &LoadedConfig::default());
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(settings.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.source, SourceKind::YtDlp);
        assert_eq!(settings.log_level, "warn");
        assert!(!settings.force_cli_log_level);
        assert!(!settings.config_loaded);
    }

    #[test]
    fn test_config_overrides_defaults() {
        let settings = Settings::resolve(
            &GlobalArgs::default(),
            &loaded(FileConfig {
                concurrency: Some(8),
                output_dir: Some(PathBuf::from("/music")),
                source: Some(SourceKind::Api),
                verbosity: Some(VerbositySetting::Debug),
                ..FileConfig::default()
            }),
        );
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.output_dir, PathBuf::from("/music"));
        assert_eq!(settings.source, SourceKind::Api);
        assert_eq!(settings.log_level, "debug");
        assert!(settings.config_loaded);
    }

    #[test]
    fn test_cli_overrides_config() {
        let global = GlobalArgs {
            concurrency: Some(2),
            max_retries: Some(0),
            lang: Some(Lang::Fr),
            source: Some(SourceKind::YtDlp),
            quiet: true,
            ..GlobalArgs::default()
        };
        let settings = Settings::resolve(
            &global,
            &loaded(FileConfig {
                concurrency: Some(8),
                max_retries: Some(5),
                lang: Some(Lang::En),
                source: Some(SourceKind::Api),
                verbosity: Some(VerbositySetting::Verbose),
                ..FileConfig::default()
            }),
        );
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.lang, Lang::Fr);
        assert_eq!(settings.source, SourceKind::YtDlp);
        assert_eq!(settings.log_level, "error");
        assert!(settings.force_cli_log_level);
    }

    #[test]
    fn test_command_output_overrides() {
        let settings = Settings::resolve(&GlobalArgs::default(), &LoadedConfig::default())
            .with_output(&OutputArgs {
                output_dir: Some(PathBuf::from("mixes")),
                quality: Some("0".parse().unwrap()),
            });
        assert_eq!(settings.output_dir, PathBuf::from("mixes"));
        assert_eq!(settings.audio_quality.value(), 0);
    }

    #[test]
    fn test_verbose_levels() {
        let file = FileConfig::default();
        let level = |verbose| {
            resolve_log_level(
                &GlobalArgs {
                    verbose,
                    ..GlobalArgs::default()
                },
                &file,
            )
        };
        assert_eq!(level(1), "info");
        assert_eq!(level(2), "debug");
        assert_eq!(level(3), "trace");
    }
}
