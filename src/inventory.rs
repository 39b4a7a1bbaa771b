//! Local inventory scanner.
//!
//! Lists the regular files of a destination directory (non-recursive) and
//! recovers each file's track identity from its name. Files whose names do
//! not encode an identity are reported separately and never touched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::identity::identity_from_path;
use crate::model::LocalFile;

/// Errors from scanning a local directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The directory does not exist, is not a directory, or cannot be read.
    #[error("directory {path} is unreadable: {reason}")]
    DirectoryUnreadable {
        /// Directory that was scanned.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
        /// Underlying IO error, when one exists.
        #[source]
        source: Option<io::Error>,
    },
}

impl ScanError {
    fn unreadable(path: &Path, source: io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.to_path_buf(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    fn not_a_directory(path: &Path) -> Self {
        Self::DirectoryUnreadable {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
            source: None,
        }
    }
}

/// Snapshot of a local directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Files with a recovered identity, sorted by path.
    pub files: Vec<LocalFile>,
    /// Regular files without an encoded identity, sorted by path.
    pub unrecognized: Vec<PathBuf>,
}

impl Inventory {
    /// Number of files carrying an identity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no identified file was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Scans a directory for identity-encoded track files.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryUnreadable`] when the path is missing, is
/// not a directory, or cannot be listed.
#[instrument(fields(dir = %dir.display()))]
pub fn scan(dir: &Path) -> Result<Inventory, ScanError> {
    let metadata = fs::metadata(dir).map_err(|e| ScanError::unreadable(dir, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::not_a_directory(dir));
    }

    let entries = fs::read_dir(dir).map_err(|e| ScanError::unreadable(dir, e))?;
    let mut inventory = Inventory::default();

    for entry in entries {
        let entry = entry.map_err(|e| ScanError::unreadable(dir, e))?;
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "skipping entry with unknown type");
                continue;
            }
        };
        if !file_type.is_file() {
            continue;
        }
        if is_hidden(&path) {
            continue;
        }

        match identity_from_path(&path) {
            Some(id) => inventory.files.push(LocalFile::new(path, id)),
            None => inventory.unrecognized.push(path),
        }
    }

    inventory.files.sort_by(|a, b| a.path.cmp(&b.path));
    inventory.unrecognized.sort();

    debug!(
        identified = inventory.files.len(),
        unrecognized = inventory.unrecognized.len(),
        "scanned local directory"
    );
    Ok(inventory)
}

/// Scans a directory, treating a missing directory as empty.
///
/// Used by download and import flows, which create their destination on
/// demand. Other failures are still reported.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryUnreadable`] when the path exists but cannot
/// be listed.
pub fn scan_or_empty(dir: &Path) -> Result<Inventory, ScanError> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "destination does not exist yet");
        return Ok(Inventory::default());
    }
    scan(dir)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
