//! End-to-end CLI tests for the playlist-downloader binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with an isolated config directory and a fixed language.
fn cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("playlist-downloader").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("LANG", "en_US.UTF-8")
        .env_remove("LC_ALL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_french_commands_and_aliases() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("telecharger"))
        .stdout(predicate::str::contains("mettre-a-jour"))
        .stdout(predicate::str::contains("importer"));
}

#[test]
fn test_version_displays_name() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("playlist-downloader"));
}

#[test]
fn test_missing_subcommand_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    cmd(&home).assert().failure().code(2);
}

#[test]
fn test_import_without_sources_fails_with_message() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("importer")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "You must provide a YAML file or at least one URL via --tune or --playlist.",
        ));
}

#[test]
fn test_import_without_sources_speaks_french() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--lang", "fr", "import"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Vous devez fournir un fichier YAML"));
}

#[test]
fn test_import_missing_yaml_file_fails() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("absent.yml");
    cmd(&home)
        .arg("importer")
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_playlist_reference_fails_before_listing() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    cmd(&home)
        .args(["telecharger", "not a playlist", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_config_show_reports_defaults() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = not found (using defaults)"))
        .stdout(predicate::str::contains("output_dir = downloads"))
        .stdout(predicate::str::contains("source = ytdlp"));
}

#[test]
fn test_config_show_reads_config_file_and_cli_overrides() {
    let home = TempDir::new().unwrap();
    let app_dir = home.path().join("playlist-downloader");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(
        app_dir.join("config.toml"),
        "output_dir = \"/srv/music\"\nconcurrency = 6\nlang = \"fr\"\n",
    )
    .unwrap();

    cmd(&home)
        .args(["-c", "2", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("output_dir = /srv/music"))
        .stdout(predicate::str::contains("concurrency = 2"))
        .stdout(predicate::str::contains("lang = fr"));
}

#[test]
fn test_invalid_config_file_fails() {
    let home = TempDir::new().unwrap();
    let app_dir = home.path().join("playlist-downloader");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("config.toml"), "concurrency = 99\n").unwrap();

    cmd(&home)
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("concurrency"));
}

#[test]
fn test_logout_without_token_succeeds() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored credentials"));
}
