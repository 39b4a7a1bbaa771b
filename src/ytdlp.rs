//! Thin wrapper around the external `yt-dlp` program.
//!
//! Both the playlist source and the fetcher shell out to `yt-dlp`; this module
//! owns program lookup, invocation, and classification of its stderr.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::{debug, instrument};

/// Default program name, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Audio quality handed to `yt-dlp --audio-quality`.
///
/// `0..=9` is the VBR scale (0 best, 9 worst); larger values are a
/// constant bitrate in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioQuality(u16);

/// Default quality: 192 kbit/s.
pub const DEFAULT_AUDIO_QUALITY: AudioQuality = AudioQuality(192);

impl AudioQuality {
    /// Creates a quality value.
    ///
    /// # Errors
    ///
    /// Returns a description when the value is neither `0..=9` nor
    /// `32..=320` kbit/s.
    pub fn new(value: u16) -> Result<Self, String> {
        if value <= 9 || (32..=320).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "audio quality {value} out of range: expected 0..=9 (VBR) or 32..=320 (kbit/s)"
            ))
        }
    }

    /// Raw value.
    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Argument for `--audio-quality`.
    #[must_use]
    pub fn as_arg(self) -> String {
        if self.0 <= 9 {
            self.0.to_string()
        } else {
            format!("{}K", self.0)
        }
    }
}

impl Default for AudioQuality {
    fn default() -> Self {
        DEFAULT_AUDIO_QUALITY
    }
}

impl std::str::FromStr for AudioQuality {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("best") {
            return Ok(Self(0));
        }
        let digits = trimmed.trim_end_matches(['k', 'K']);
        let value = digits
            .parse::<u16>()
            .map_err(|_| format!("invalid audio quality '{raw}'"))?;
        Self::new(value)
    }
}

/// Handle on the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl YtDlp {
    /// Creates a handle for the given program path or name.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program path or name.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the program to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns the spawn error when the program cannot be started.
    #[instrument(level = "debug", skip(self, args), fields(program = %self.program.display()))]
    pub async fn run<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;
        debug!(status = ?output.status.code(), "yt-dlp exited");
        Ok(output)
    }
}

/// Coarse classification of a failed `yt-dlp` run, from its stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The video or playlist is gone, private, or blocked.
    Unavailable,
    /// Network trouble; may succeed later.
    Network,
    /// YouTube is throttling requests (HTTP 429).
    RateLimited,
    /// Post-processing (ffmpeg) failed.
    PostProcessing,
    /// Anything else.
    Other,
}

/// Classifies `yt-dlp` stderr text.
#[must_use]
pub fn classify_stderr(stderr: &str) -> FailureKind {
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("video unavailable")
        || lower.contains("private video")
        || lower.contains("has been removed")
        || lower.contains("does not exist")
        || lower.contains("http error 404")
        || lower.contains("http error 410")
    {
        FailureKind::Unavailable
    } else if lower.contains("http error 429") || lower.contains("too many requests") {
        FailureKind::RateLimited
    } else if lower.contains("ffmpeg") || lower.contains("postprocessing") {
        FailureKind::PostProcessing
    } else if lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("temporary failure")
        || lower.contains("http error 5")
        || lower.contains("unable to download")
    {
        FailureKind::Network
    } else {
        FailureKind::Other
    }
}

/// Last non-empty stderr line, for concise error messages.
#[must_use]
pub fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}
