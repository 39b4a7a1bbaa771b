//! Track identity encoding in local file names.
//!
//! Fetched files are named `{sanitized title} [{id}].mp3`. The identity is
//! recovered from the bracketed suffix only; the title part is free text and
//! may be renamed or re-encoded without changing what the file is.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Track, TrackId};

/// Audio container extension for fetched tracks (without dot).
pub const AUDIO_EXTENSION: &str = "mp3";

/// Maximum characters kept from a title in a file name.
pub const MAX_TITLE_CHARS: usize = 120;

/// Title used when sanitizing leaves nothing usable.
const FALLBACK_TITLE: &str = "track";

/// Matches `... [id].mp3` at the end of a file name.
#[allow(clippy::expect_used)]
static IDENTITY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[([A-Za-z0-9_-]+)\]\.mp3$").expect("identity regex is valid") // Static pattern, safe to panic
});

/// Builds the file name that encodes a track's identity.
///
/// # Example
///
/// ```
/// use playlist_core::identity::{encode_file_name, identity_from_file_name};
/// use playlist_core::{Track, TrackId};
///
/// let track = Track::new(TrackId::new("dQw4w9WgXcQ").unwrap(), "Never: Gonna/Give", 0);
/// let name = encode_file_name(&track);
/// assert_eq!(name, "Never_Gonna_Give [dQw4w9WgXcQ].mp3");
/// assert_eq!(identity_from_file_name(&name).unwrap().as_str(), "dQw4w9WgXcQ");
/// ```
#[must_use]
pub fn encode_file_name(track: &Track) -> String {
    let title = sanitize_title(&track.title);
    format!("{title} [{}].{AUDIO_EXTENSION}", track.id)
}

/// Name of the temporary file a fetch writes before its final rename.
///
/// Starts with a dot and does not end in `.mp3`, so the scanner never
/// mistakes an interrupted fetch for a complete track.
#[must_use]
pub fn partial_file_name(id: &TrackId) -> String {
    format!(".{id}.part")
}

/// Recovers the identity encoded in a file name, if any.
#[must_use]
pub fn identity_from_file_name(file_name: &str) -> Option<TrackId> {
    let captures = IDENTITY_SUFFIX.captures(file_name)?;
    let raw = captures.get(1)?.as_str();
    TrackId::new(raw).ok()
}

/// Recovers the identity encoded in a path's final component.
#[must_use]
pub fn identity_from_path(path: &Path) -> Option<TrackId> {
    let name = path.file_name()?.to_str()?;
    identity_from_file_name(name)
}

/// Sanitizes a title for use inside a file name.
///
/// Path separators, reserved characters, control characters and whitespace
/// runs collapse into a single `_`; square brackets are replaced so they can
/// never be confused with the identity suffix.
pub(crate) fn sanitize_title(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '[' | ']' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')' | '&' | ',' | '\'' | '!') => c,
            _ => '_',
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '_' || c == '.');
    let truncated: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    let truncated = truncated.trim_end_matches(|c| c == '_' || c == '.');
    if truncated.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        truncated.to_string()
    }
}
