//! Track fetcher backed by `yt-dlp` audio extraction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{FetchError, Fetcher};
use crate::identity::{AUDIO_EXTENSION, partial_file_name};
use crate::layout::resolve_destination;
use crate::model::{Track, TrackId};
use crate::tags;
use crate::ytdlp::{AudioQuality, YtDlp, classify_stderr, last_error_line};

/// Copies the watch URL into the ID3 comment frame.
const COMMENT_FROM_URL: &str = "webpage_url:(?P<meta_comment>.+)";

/// Downloads a track and converts it to MP3 with `yt-dlp -x`.
///
/// Output goes to a hidden `.{id}.part` file in the destination directory and
/// is renamed onto the final identity-encoded name only after `yt-dlp`
/// succeeds, so an interrupted run never leaves a file the scanner would
/// mistake for a finished track. Title/artist tags are embedded and the
/// comment frame carries the watch URL.
#[derive(Debug, Clone, Default)]
pub struct YtDlpFetcher {
    ytdlp: YtDlp,
    quality: AudioQuality,
}

impl YtDlpFetcher {
    /// Creates a fetcher.
    #[must_use]
    pub fn new(ytdlp: YtDlp, quality: AudioQuality) -> Self {
        Self { ytdlp, quality }
    }

    /// Configured audio quality.
    #[must_use]
    pub fn quality(&self) -> AudioQuality {
        self.quality
    }

    fn arguments(&self, track: &Track, template: &Path) -> Vec<String> {
        vec![
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            AUDIO_EXTENSION.to_string(),
            "--audio-quality".to_string(),
            self.quality.as_arg(),
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--embed-metadata".to_string(),
            "--parse-metadata".to_string(),
            COMMENT_FROM_URL.to_string(),
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "--no-warnings".to_string(),
            "--force-overwrites".to_string(),
            "--output".to_string(),
            template.to_string_lossy().into_owned(),
            track.url(),
        ]
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    #[instrument(skip(self, track), fields(id = %track.id, destination = %destination.display()))]
    async fn fetch(&self, track: &Track, destination: &Path) -> Result<PathBuf, FetchError> {
        let final_path = resolve_destination(track, None, destination, true).map_err(|e| {
            FetchError::Destination {
                id: track.id.clone(),
                reason: e.to_string(),
            }
        })?;

        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|e| FetchError::io(destination, e))?;

        let partial = partial_file_name(&track.id);
        let template = destination.join(format!("{partial}.%(ext)s"));
        let produced = destination.join(format!("{partial}.{AUDIO_EXTENSION}"));

        let output = self
            .ytdlp
            .run(self.arguments(track, &template))
            .await
            .map_err(|source| FetchError::Spawn {
                program: self.ytdlp.program().to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            remove_partials(destination, &track.id).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            let kind = classify_stderr(&stderr);
            debug!(?kind, "yt-dlp failed");
            return Err(FetchError::from_kind(kind, &track.id, last_error_line(&stderr)));
        }

        if tokio::fs::metadata(&produced).await.is_err() {
            remove_partials(destination, &track.id).await;
            return Err(FetchError::MissingOutput {
                id: track.id.clone(),
                path: produced,
            });
        }

        if let Err(error) = tokio::fs::rename(&produced, &final_path).await {
            remove_partials(destination, &track.id).await;
            return Err(FetchError::io(&final_path, error));
        }

        verify_source_tag(track, &final_path).await;
        info!(path = %final_path.display(), "track fetched");
        Ok(final_path)
    }
}

/// Logs when the embedded comment does not point back at the fetched video.
async fn verify_source_tag(track: &Track, path: &Path) {
    let owned = path.to_path_buf();
    let tagged = tokio::task::spawn_blocking(move || tags::source_id(&owned))
        .await
        .ok()
        .flatten();
    match tagged {
        Some(id) if id == track.id => {}
        Some(id) => warn!(expected = %track.id, found = %id, "embedded comment names another video"),
        None => debug!(path = %path.display(), "no source tag embedded"),
    }
}

/// Removes every leftover `.{id}.part*` file of a failed fetch.
async fn remove_partials(destination: &Path, id: &TrackId) {
    let prefix = partial_file_name(id);
    let Ok(mut entries) = tokio::fs::read_dir(destination).await else {
        return;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(&prefix) {
            let path = entry.path();
            if let Err(error) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %error, "could not remove partial file");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn track() -> Track {
        Track::new(TrackId::new("abc123").unwrap(), "Song", 0)
    }

    #[test]
    fn test_arguments_request_mp3_at_quality() {
        let fetcher = YtDlpFetcher::new(YtDlp::default(), AudioQuality::new(256).unwrap());
        let args = fetcher.arguments(&track(), Path::new("/out/.abc123.part.%(ext)s"));
        let joined = args.join(" ");
        assert!(joined.contains("--audio-format mp3"), "{joined}");
        assert!(joined.contains("--audio-quality 256K"), "{joined}");
        assert!(joined.contains("--no-playlist"), "{joined}");
        assert!(joined.contains("--embed-metadata"), "{joined}");
        assert!(
            joined.contains("--parse-metadata webpage_url:(?P<meta_comment>.+)"),
            "{joined}"
        );
        assert!(joined.contains("--output /out/.abc123.part.%(ext)s"), "{joined}");
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc123");
    }

    #[tokio::test]
    async fn test_remove_partials_only_touches_matching_id() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".abc123.part.webm"), b"x").unwrap();
        std::fs::write(dir.path().join(".abc123.part.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join(".other.part.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("Song [abc123].mp3"), b"x").unwrap();

        remove_partials(dir.path(), &TrackId::new("abc123").unwrap()).await;

        assert!(!dir.path().join(".abc123.part.webm").exists());
        assert!(!dir.path().join(".abc123.part.mp3").exists());
        assert!(dir.path().join(".other.part.mp3").exists());
        assert!(dir.path().join("Song [abc123].mp3").exists());
    }

    /// Writes a stand-in `yt-dlp` that creates its `--output` file.
    #[cfg(unix)]
    fn fake_ytdlp(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("fake-yt-dlp");
        std::fs::write(
            &script,
            r#"#!/bin/sh
while [ $# -gt 0 ]; do
  if [ "$1" = --output ]; then shift; out="$1"; fi
  shift
done
printf mp3 > "$(printf '%s' "$out" | sed 's/%(ext)s/mp3/')"
"#,
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_writes_to_resolved_destination() {
        let bin = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let fetcher = YtDlpFetcher::new(YtDlp::new(fake_ytdlp(bin.path())), AudioQuality::default());
        let track = Track::new(TrackId::new("abc123").unwrap(), "../../etc/Song", 0);

        let path = fetcher.fetch(&track, out.path()).await.unwrap();

        assert_eq!(path, resolve_destination(&track, None, out.path(), true).unwrap());
        assert_eq!(path.parent().unwrap(), out.path());
        assert!(path.exists());
        assert!(!out.path().join(".abc123.part.mp3").exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let fetcher = YtDlpFetcher::new(YtDlp::new("/nonexistent/yt-dlp"), AudioQuality::default());
        let err = fetcher.fetch(&track(), dir.path()).await.unwrap_err();
        assert!(matches!(err, FetchError::Spawn { .. }));
    }
}
