//! CLI argument definitions using clap derive macros.
//!
//! Subcommands keep their French names with English aliases.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use playlist_core::i18n::Lang;
use playlist_core::source::SourceKind;
use playlist_core::ytdlp::AudioQuality;

/// Create, share, download and synchronize YouTube playlists.
///
/// Downloads become MP3 files whose names carry the video id, so later
/// synchronizations know exactly which tracks are already present.
#[derive(Parser, Debug)]
#[command(name = "playlist-downloader")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Language of user-facing messages (en or fr)
    #[arg(long, global = true)]
    pub lang: Option<Lang>,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// How remote playlists are listed: ytdlp (no credentials) or api
    #[arg(long, global = true)]
    pub source: Option<SourceKind>,

    /// Maximum parallel downloads (1-16)
    #[arg(short = 'c', long, global = true, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: Option<u8>,

    /// Maximum attempts per track for transient failures (0-10)
    #[arg(short = 'r', long, global = true, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new YouTube playlist
    #[command(name = "creer", visible_alias = "create")]
    Create(CreateArgs),

    /// Download a playlist as MP3 files
    #[command(name = "telecharger", visible_alias = "download")]
    Download(DownloadArgs),

    /// Mirror a playlist: download new tracks and delete removed ones
    #[command(name = "mettre-a-jour", visible_alias = "sync")]
    Sync(SyncArgs),

    /// Delete a YouTube playlist
    #[command(name = "detruire", visible_alias = "delete")]
    Delete(PlaylistIdArgs),

    /// Print the share URL of a playlist
    #[command(name = "partager", visible_alias = "share")]
    Share(PlaylistIdArgs),

    /// Download playlists and tracks grouped by artist
    #[command(name = "importer", visible_alias = "import")]
    Import(ImportArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage stored Google credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Title of the new playlist
    #[arg(short = 't', long = "titre", visible_alias = "title")]
    pub title: String,

    /// Description of the playlist
    #[arg(short = 'd', long, default_value = "")]
    pub description: String,

    /// Make the playlist public (private by default)
    #[arg(long)]
    pub public: bool,
}

/// Output options shared by commands that write tracks.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Destination directory
    #[arg(short = 'o', long = "output", visible_alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Audio quality: 0-9 (VBR, 0 best) or 32-320 kbit/s
    #[arg(long)]
    pub quality: Option<AudioQuality>,
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Playlist URL or id
    pub url: String,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Skip tracks that already exist locally
    #[arg(long)]
    pub green: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Playlist URL or id
    pub url: String,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Keep local tracks that were removed from the playlist
    #[arg(long)]
    pub keep_orphans: bool,

    /// Print the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PlaylistIdArgs {
    /// Playlist id or URL
    pub playlist: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// YAML file listing artists with their playlists and tunes
    pub file: Option<PathBuf>,

    /// Single track URL to download (repeatable)
    #[arg(long = "tune")]
    pub tunes: Vec<String>,

    /// Playlist URL to download (repeatable)
    #[arg(long = "playlist")]
    pub playlists: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Put every track in the output directory instead of per-artist folders
    #[arg(long)]
    pub flat: bool,

    /// Skip tracks that already exist locally
    #[arg(long)]
    pub green: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum AuthCommand {
    /// Authorize access to your YouTube account
    Login,
    /// Remove the stored token
    Logout,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("playlist-downloader").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = parse(&["--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_french_and_english_names() {
        for name in ["creer", "create"] {
            let cli = parse(&[name, "-t", "Mix"]).unwrap();
            assert!(matches!(cli.command, Command::Create(ref args) if args.title == "Mix"));
        }
        for name in ["telecharger", "download"] {
            let cli = parse(&[name, "PLabc"]).unwrap();
            assert!(matches!(cli.command, Command::Download(_)));
        }
        for name in ["mettre-a-jour", "sync"] {
            assert!(matches!(parse(&[name, "PLabc"]).unwrap().command, Command::Sync(_)));
        }
        for name in ["detruire", "delete"] {
            assert!(matches!(parse(&[name, "PLabc"]).unwrap().command, Command::Delete(_)));
        }
        for name in ["partager", "share"] {
            assert!(matches!(parse(&[name, "PLabc"]).unwrap().command, Command::Share(_)));
        }
        for name in ["importer", "import"] {
            assert!(matches!(parse(&[name]).unwrap().command, Command::Import(_)));
        }
    }

    #[test]
    fn test_cli_create_options() {
        let cli = parse(&["creer", "--title", "Mix", "-d", "Road trip", "--public"]).unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.title, "Mix");
        assert_eq!(args.description, "Road trip");
        assert!(args.public);
    }

    #[test]
    fn test_cli_create_requires_title() {
        let err = parse(&["creer"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_download_options() {
        let cli = parse(&[
            "telecharger",
            "https://www.youtube.com/playlist?list=PLabc",
            "-o",
            "music",
            "--green",
            "--quality",
            "320",
        ])
        .unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.output.output_dir, Some(PathBuf::from("music")));
        assert_eq!(args.output.quality.unwrap().value(), 320);
        assert!(args.green);
    }

    #[test]
    fn test_cli_rejects_invalid_quality() {
        let err = parse(&["telecharger", "PLabc", "--quality", "12"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_sync_flags() {
        let cli = parse(&["sync", "PLabc", "--keep-orphans", "--dry-run"]).unwrap();
        let Command::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert!(args.keep_orphans);
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_import_repeatable_sources() {
        let cli = parse(&[
            "importer",
            "musics.yml",
            "--tune",
            "https://youtu.be/a",
            "--playlist",
            "PLabc",
            "--tune",
            "https://youtu.be/b",
            "--output-dir",
            "out",
            "--flat",
        ])
        .unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.file, Some(PathBuf::from("musics.yml")));
        assert_eq!(args.tunes.len(), 2);
        assert_eq!(args.playlists, vec!["PLabc"]);
        assert_eq!(args.output.output_dir, Some(PathBuf::from("out")));
        assert!(args.flat);
        assert!(!args.green);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = parse(&["sync", "PLabc", "-vv", "--lang", "fr", "--source", "api", "-c", "8"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.lang, Some(Lang::Fr));
        assert_eq!(cli.global.source, Some(SourceKind::Api));
        assert_eq!(cli.global.concurrency, Some(8));
    }

    #[test]
    fn test_cli_concurrency_range() {
        assert!(parse(&["sync", "PLabc", "-c", "16"]).is_ok());
        let err = parse(&["sync", "PLabc", "-c", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        let err = parse(&["sync", "PLabc", "-c", "17"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let err = parse(&["sync", "PLabc", "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_auth_and_config_subcommands() {
        assert!(matches!(
            parse(&["auth", "login"]).unwrap().command,
            Command::Auth {
                command: AuthCommand::Login
            }
        ));
        assert!(matches!(
            parse(&["config", "show"]).unwrap().command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }
}
