//! Embedded ID3 metadata of fetched MP3 files.
//!
//! The fetcher asks `yt-dlp` to embed title/artist tags and to store the
//! watch URL in the comment frame. This module reads that comment back.

use std::path::Path;

use lofty::prelude::*;
use lofty::read_from_path;
use lofty::tag::ItemKey;
use tracing::{debug, warn};

use crate::model::TrackId;
use crate::source::parse_video_id;

/// Reads the comment tag of an audio file.
///
/// Returns `None` when the file does not exist, carries no tag, or has no
/// comment. Unreadable files are logged and also yield `None`.
#[must_use]
pub fn read_comment(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }

    let tagged = match read_from_path(path) {
        Ok(tagged) => tagged,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "cannot read tags");
            return None;
        }
    };

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        debug!(path = %path.display(), "file has no tag");
        return None;
    };
    tag.get_string(&ItemKey::Comment).map(str::to_string)
}

/// Identity of the video a file was fetched from, per its comment tag.
#[must_use]
pub fn source_id(path: &Path) -> Option<TrackId> {
    let comment = read_comment(path)?;
    parse_video_id(&comment).ok()
}
