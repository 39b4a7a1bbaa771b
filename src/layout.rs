//! Destination paths for bulk import.
//!
//! Bulk imports group tracks by an artist/grouping label. With `flat` every
//! track lands directly in the base directory; otherwise each label gets its
//! own sanitized subdirectory. Computed paths never leave the base directory.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::identity::encode_file_name;
use crate::model::Track;

/// Maximum characters kept from a grouping label.
pub const MAX_GROUP_LABEL_CHARS: usize = 80;

/// Errors from destination path computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The label has no usable folder-name characters after sanitizing.
    #[error("group label '{label}' contains no usable folder-name characters")]
    InvalidLabel {
        /// The rejected label.
        label: String,
    },

    /// The computed path would resolve outside the base directory.
    #[error("destination {path} escapes base directory {base}")]
    EscapesBase {
        /// Computed path.
        path: PathBuf,
        /// Base directory.
        base: PathBuf,
    },
}

/// Computes where a track should be written during a bulk import.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidLabel`] when a label sanitizes to nothing and
/// [`LayoutError::EscapesBase`] if the result would leave `base_dir`.
pub fn resolve_destination(
    track: &Track,
    group_label: Option<&str>,
    base_dir: &Path,
    flat: bool,
) -> Result<PathBuf, LayoutError> {
    let directory = group_directory(base_dir, group_label, flat)?;
    let path = directory.join(encode_file_name(track));
    ensure_within(&path, base_dir)?;
    Ok(path)
}

/// Directory a group's tracks are written to.
///
/// # Errors
///
/// Same as [`resolve_destination`].
pub fn group_directory(
    base_dir: &Path,
    group_label: Option<&str>,
    flat: bool,
) -> Result<PathBuf, LayoutError> {
    let Some(label) = group_label.filter(|_| !flat) else {
        return Ok(base_dir.to_path_buf());
    };
    let segment = sanitize_group_label(label)?;
    let directory = base_dir.join(segment);
    ensure_within(&directory, base_dir)?;
    Ok(directory)
}

/// Sanitizes a grouping label into a single safe path segment.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidLabel`] for empty, `.`/`..`, or otherwise
/// unusable labels.
pub fn sanitize_group_label(label: &str) -> Result<String, LayoutError> {
    let invalid = || LayoutError::InvalidLabel {
        label: label.to_string(),
    };

    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(invalid());
    }

    let mut sanitized = String::new();
    let mut previous_dash = false;
    for ch in trimmed.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        };
        if mapped == '-' {
            if !previous_dash {
                sanitized.push('-');
                previous_dash = true;
            }
        } else {
            sanitized.push(mapped);
            previous_dash = false;
        }
    }

    let mut sanitized = sanitized
        .trim_matches(|c: char| c == '-' || c == '.' || c.is_whitespace())
        .to_string();
    if is_windows_reserved_name(&sanitized) {
        sanitized.push_str("-artist");
    }
    if sanitized.chars().count() > MAX_GROUP_LABEL_CHARS {
        sanitized = sanitized.chars().take(MAX_GROUP_LABEL_CHARS).collect();
        sanitized = sanitized.trim_end_matches(['-', ' ']).to_string();
    }
    if sanitized.is_empty() {
        return Err(invalid());
    }
    Ok(sanitized)
}

fn is_windows_reserved_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    matches!(
        upper.as_str(),
        "CON" | "PRN" | "AUX" | "NUL"
            | "COM1" | "COM2" | "COM3" | "COM4" | "COM5" | "COM6" | "COM7" | "COM8" | "COM9"
            | "LPT1" | "LPT2" | "LPT3" | "LPT4" | "LPT5" | "LPT6" | "LPT7" | "LPT8" | "LPT9"
    )
}

fn ensure_within(path: &Path, base_dir: &Path) -> Result<(), LayoutError> {
    let escapes = || LayoutError::EscapesBase {
        path: path.to_path_buf(),
        base: base_dir.to_path_buf(),
    };
    let relative = path.strip_prefix(base_dir).map_err(|_| escapes())?;
    if relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Ok(())
    } else {
        Err(escapes())
    }
}
