//! Error types for bulk imports.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::execute::ExecuteError;
use crate::inventory::ScanError;
use crate::layout::LayoutError;
use crate::source::SourceError;

/// Errors that stop an import before or during execution.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Neither a declaration file nor any CLI source was given.
    #[error("You must provide a YAML file or at least one URL via --tune or --playlist.")]
    NoSources,

    /// The declaration file does not exist.
    #[error("import file {path} not found")]
    NotFound {
        /// Declaration file.
        path: PathBuf,
    },

    /// The declaration file exists but cannot be read.
    #[error("cannot read import file {path}: {source}")]
    Unreadable {
        /// Declaration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The declaration file is not valid YAML or has the wrong shape.
    #[error("invalid syntax in import file {path}: {source}")]
    InvalidYaml {
        /// Declaration file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A playlist entry is not a usable playlist reference.
    #[error("invalid playlist entry: {0}")]
    InvalidPlaylist(#[source] SourceError),

    /// The executor failed as a whole.
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

impl ImportError {
    /// Maps a read failure on `path`, keeping "not found" distinct.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Unreadable { path, source }
        }
    }
}

/// Why a single import job was abandoned. Other jobs still run.
#[derive(Debug, Error)]
pub enum JobError {
    /// The group label cannot become a directory.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The playlist or tune could not be listed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The job's destination could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),
}
