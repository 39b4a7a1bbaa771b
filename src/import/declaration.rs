//! YAML import declarations.
//!
//! ```yaml
//! artists:
//!   - name: "Artist"
//!     playlists: ["https://www.youtube.com/playlist?list=PL..."]
//!     tunes: ["https://www.youtube.com/watch?v=..."]
//! ```
//!
//! Older files use `artistes` as the top-level key; both are accepted.

use std::path::Path;

use serde::Deserialize;

use super::error::ImportError;

/// Parsed declaration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDeclaration {
    /// Artists in file order.
    #[serde(default, alias = "artistes")]
    pub artists: Vec<ArtistEntry>,
}

/// One artist block. Incomplete blocks are kept so they can be reported.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistEntry {
    /// Group label; missing names make the entry unusable.
    #[serde(default)]
    pub name: Option<String>,
    /// Playlist URLs or ids.
    #[serde(default)]
    pub playlists: Vec<String>,
    /// Single track URLs.
    #[serde(default)]
    pub tunes: Vec<String>,
}

impl ArtistEntry {
    /// Trimmed, non-empty name.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Whether the entry has a name and at least one source.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.label().is_some() && !(self.playlists.is_empty() && self.tunes.is_empty())
    }
}

impl ImportDeclaration {
    /// Parses declaration text; `path` is only used in errors.
    ///
    /// An empty document is an empty declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidYaml`] for malformed input.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ImportError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Option<Self>>(raw)
            .map(Option::unwrap_or_default)
            .map_err(|source| ImportError::InvalidYaml {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Reads and parses a declaration file.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::NotFound`] / [`ImportError::Unreadable`] when
    /// the file cannot be read and [`ImportError::InvalidYaml`] when it does
    /// not parse.
    pub async fn load(path: &Path) -> Result<Self, ImportError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ImportError::read(path, e))?;
        Self::parse(&raw, path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<ImportDeclaration, ImportError> {
        ImportDeclaration::parse(raw, Path::new("musics.yml"))
    }

    #[test]
    fn test_parses_artists() {
        let decl = parse(
            r#"
artists:
  - name: "Artist With Playlist"
    playlists: ["https://www.youtube.com/playlist?list=PL123"]
  - name: "Artist With Tune"
    tunes:
      - "https://youtu.be/dQw4w9WgXcQ"
"#,
        )
        .unwrap();

        assert_eq!(decl.artists.len(), 2);
        assert_eq!(decl.artists[0].label(), Some("Artist With Playlist"));
        assert_eq!(decl.artists[0].playlists.len(), 1);
        assert!(decl.artists[0].tunes.is_empty());
        assert_eq!(decl.artists[1].tunes.len(), 1);
    }

    #[test]
    fn test_accepts_legacy_key() {
        let decl = parse("artistes:\n  - name: \"Artiste 1\"\n    tunes: [\"url1\"]\n").unwrap();
        assert_eq!(decl.artists.len(), 1);
        assert!(decl.artists[0].is_complete());
    }

    #[test]
    fn test_incomplete_entries_are_kept() {
        let decl = parse(
            r#"
artists:
  - name: "Valid"
    tunes: ["url1"]
  - name: "No Tracks"
  - tunes: ["url2"]
  - name: "   "
    tunes: ["url3"]
"#,
        )
        .unwrap();

        let complete: Vec<bool> = decl.artists.iter().map(ArtistEntry::is_complete).collect();
        assert_eq!(complete, vec![true, false, false, false]);
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let err = parse("artists: - name: 'Artist 1'").unwrap_err();
        assert!(matches!(err, ImportError::InvalidYaml { .. }));
        assert!(err.to_string().contains("invalid syntax"));
    }

    #[test]
    fn test_empty_document_is_empty_declaration() {
        assert!(parse("").unwrap().artists.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ImportDeclaration::load(Path::new("/nonexistent/musics.yml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::NotFound { .. }));
    }
}
