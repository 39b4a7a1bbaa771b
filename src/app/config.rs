//! Configuration file loading for CLI defaults.
//!
//! The file is a flat `key = value` subset of TOML: double-quoted strings,
//! integers, and `#` comments.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use playlist_core::i18n::Lang;
use playlist_core::source::SourceKind;
use playlist_core::ytdlp::AudioQuality;

/// Directory name under the user config directory.
pub(crate) const APP_DIR_NAME: &str = "playlist-downloader";

/// File-backed defaults. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FileConfig {
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) audio_quality: Option<AudioQuality>,
    pub(crate) concurrency: Option<u8>,
    pub(crate) max_retries: Option<u8>,
    pub(crate) lang: Option<Lang>,
    pub(crate) verbosity: Option<VerbositySetting>,
    pub(crate) token_file: Option<PathBuf>,
    pub(crate) client_secrets_file: Option<PathBuf>,
    pub(crate) ytdlp_path: Option<PathBuf>,
    pub(crate) api_timeout_secs: Option<u64>,
    pub(crate) source: Option<SourceKind>,
}

impl FileConfig {
    /// Validates values against the same ranges the CLI enforces.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=16).contains(&concurrency)
        {
            bail!("Invalid config value for `concurrency`: {concurrency}. Expected range: 1..=16");
        }
        if let Some(max_retries) = self.max_retries
            && max_retries > 10
        {
            bail!("Invalid config value for `max_retries`: {max_retries}. Expected range: 0..=10");
        }
        if let Some(timeout) = self.api_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            bail!("Invalid config value for `api_timeout_secs`: {timeout}. Expected range: 1..=300");
        }
        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

/// Config file location and contents.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub(crate) path: Option<PathBuf>,
    /// Parsed file config when the file exists.
    pub(crate) config: Option<FileConfig>,
}

impl LoadedConfig {
    pub(crate) fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }

    pub(crate) fn file(&self) -> FileConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Application config directory.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/playlist-downloader`
/// 2. `$HOME/.config/playlist-downloader`
pub(crate) fn resolve_config_dir() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR_NAME));
    }
    let home = env_var_non_empty_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads `config.toml` from the config directory if present.
pub(crate) fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_config_dir().map(|dir| dir.join("config.toml"));
    let config = match path.as_deref() {
        Some(path) if path.exists() => Some(load_file_config(path)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output_dir" => cfg.output_dir = Some(parse_path(value).with_context(context)?),
            "token_file" => cfg.token_file = Some(parse_path(value).with_context(context)?),
            "client_secrets_file" => {
                cfg.client_secrets_file = Some(parse_path(value).with_context(context)?);
            }
            "ytdlp_path" => cfg.ytdlp_path = Some(parse_path(value).with_context(context)?),
            "audio_quality" => {
                let parsed = parse_integer_u64(value).with_context(context)?;
                let quality = u16::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("audio_quality out of range for u16"))
                    .and_then(|q| AudioQuality::new(q).map_err(anyhow::Error::msg))
                    .with_context(context)?;
                cfg.audio_quality = Some(quality);
            }
            "concurrency" => cfg.concurrency = Some(parse_integer_u8(value).with_context(context)?),
            "max_retries" => cfg.max_retries = Some(parse_integer_u8(value).with_context(context)?),
            "api_timeout_secs" => {
                cfg.api_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "lang" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.lang = Some(
                    parsed
                        .parse::<Lang>()
                        .map_err(anyhow::Error::msg)
                        .with_context(context)?,
                );
            }
            "source" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.source = Some(
                    parsed
                        .parse::<SourceKind>()
                        .map_err(anyhow::Error::msg)
                        .with_context(context)?,
                );
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(context)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_path(raw_value: &str) -> Result<PathBuf> {
    let parsed = parse_string_literal(raw_value)?;
    if parsed.trim().is_empty() {
        bail!("Expected a non-empty path");
    }
    Ok(expand_home(&parsed))
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = env_var_non_empty_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(raw)
}

fn parse_integer_u8(raw_value: &str) -> Result<u8> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<u16>()?;
    u8::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
concurrency = 8
lang = "fr"
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.concurrency, Some(8));
        assert_eq!(cfg.lang, Some(Lang::Fr));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
output_dir = "/music"
audio_quality = 320
concurrency = 2
max_retries = 5
lang = "en"
verbosity = "quiet"
token_file = "/secrets/token.json"
client_secrets_file = "/secrets/client_secret.json"
ytdlp_path = "/usr/local/bin/yt-dlp"
api_timeout_secs = 60
source = "api"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/music")));
        assert_eq!(cfg.audio_quality.map(AudioQuality::value), Some(320));
        assert_eq!(cfg.max_retries, Some(5));
        assert_eq!(cfg.token_file, Some(PathBuf::from("/secrets/token.json")));
        assert_eq!(cfg.ytdlp_path, Some(PathBuf::from("/usr/local/bin/yt-dlp")));
        assert_eq!(cfg.api_timeout_secs, Some(60));
        assert_eq!(cfg.source, Some(SourceKind::Api));
    }

    #[test]
    fn test_parse_config_rejects_invalid_concurrency() {
        let err = parse_config_str("concurrency = 17").expect_err("invalid concurrency expected");
        assert!(
            err.to_string().contains("concurrency"),
            "expected concurrency validation error"
        );
    }

    #[test]
    fn test_parse_config_rejects_invalid_quality() {
        let err = parse_config_str("audio_quality = 12").expect_err("invalid quality expected");
        assert!(format!("{err:#}").contains("audio_quality"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_lang_and_source() {
        assert!(parse_config_str(r#"lang = "de""#).is_err());
        assert!(parse_config_str(r#"source = "scraper""#).is_err());
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("concurrency = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_paths() {
        let err = parse_config_str("output_dir = /music").expect_err("expected quoting error");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
concurrency = 4 # workers
output_dir = "/music/#mixes" # hash inside the string stays
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.concurrency, Some(4));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/music/#mixes")));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("concurrency 4").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }
}
