//! User-facing messages in English and French.
//!
//! Templates use `{name}` placeholders. Placeholders without a matching
//! argument are left as-is, so a missing value never hides the message.

use std::fmt;
use std::str::FromStr;

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    /// English.
    #[default]
    En,
    /// French.
    Fr,
}

impl Lang {
    /// Language code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Guesses the language from a locale string such as `fr_FR.UTF-8`.
    #[must_use]
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_ascii_lowercase().starts_with("fr") {
            Self::Fr
        } else {
            Self::En
        }
    }

    /// Language from `LC_ALL`, then `LANG`; English when neither is set.
    #[must_use]
    pub fn from_env() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .map_or(Self::En, |value| Self::from_locale(&value))
    }

    /// Explicit choice, then configured choice, then the environment.
    #[must_use]
    pub fn resolve(explicit: Option<Self>, configured: Option<Self>) -> Self {
        explicit.or(configured).unwrap_or_else(Self::from_env)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            other => Err(format!("unsupported language '{other}' (expected en or fr)")),
        }
    }
}

/// Message identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    AuthAttempt,
    AuthSuccess,
    LoggedOut,
    NotLoggedIn,
    CreatingPlaylist,
    PlaylistCreated,
    DeletingPlaylist,
    PlaylistDeleted,
    GettingUrl,
    PlaylistShared,
    PreparingDownload,
    PreparingSync,
    RemotePlaylistInfo,
    LocalFolderInfo,
    FilesToDownload,
    FilesToDelete,
    FileExistsSkipping,
    NothingToDo,
    DryRun,
    StartingDownload,
    StartingDeletion,
    FileDownloaded,
    FileDownloadError,
    FileDeleted,
    FileDeletionError,
    DuplicateIdentity,
    Interrupted,
    PlaylistDownloaded,
    SyncCompleted,
    ImportStarted,
    ProcessingArtist,
    ProcessingSource,
    ArtistIgnored,
    ImportJobFailed,
    ImportCompleted,
    ImportSourceMissing,
    RunSummary,
    Error,
}

impl MessageKey {
    fn template(self, lang: Lang) -> &'static str {
        match lang {
            Lang::En => english(self),
            Lang::Fr => french(self),
        }
    }
}

fn english(key: MessageKey) -> &'static str {
    use MessageKey as K;
    match key {
        K::AuthAttempt => "Attempting to authenticate with Google...",
        K::AuthSuccess => "Authentication successful. Token saved to {path}.",
        K::LoggedOut => "Removed stored credentials at {path}.",
        K::NotLoggedIn => "No stored credentials at {path}.",
        K::CreatingPlaylist => "Creating playlist '{name}'...",
        K::PlaylistCreated => "Playlist '{playlist_name}' created successfully. URL: {playlist_url}",
        K::DeletingPlaylist => "Deleting playlist '{name}'...",
        K::PlaylistDeleted => "Playlist '{playlist_name}' deleted successfully.",
        K::GettingUrl => "Getting URL for playlist '{name}'...",
        K::PlaylistShared => "Share URL for playlist '{playlist_name}': {playlist_url}",
        K::PreparingDownload => "Preparing to download playlist...",
        K::PreparingSync => "Preparing to synchronize playlist...",
        K::RemotePlaylistInfo => "Remote playlist '{title}' contains {count} tracks.",
        K::LocalFolderInfo => "Local directory contains {count} tracks.",
        K::FilesToDownload => "{count} new tracks to download.",
        K::FilesToDelete => "{count} local tracks to delete.",
        K::FileExistsSkipping => "File '{file_path}' already exists, skipping download.",
        K::NothingToDo => "Everything is up to date.",
        K::DryRun => "Dry run: no changes were made.",
        K::StartingDownload => "Starting download...",
        K::StartingDeletion => "Starting deletion...",
        K::FileDownloaded => "Downloaded: {name}",
        K::FileDownloadError => "Failed to download {name}: {error}",
        K::FileDeleted => "Deleted: {name}",
        K::FileDeletionError => "Failed to delete {name}: {error}",
        K::DuplicateIdentity => "Warning: {detail}",
        K::Interrupted => "Interrupted: {count} tracks were not started.",
        K::PlaylistDownloaded => "Playlist '{playlist_url}' downloaded to '{directory}'.",
        K::SyncCompleted => "Synchronization complete",
        K::ImportStarted => "Importing music from '{yaml_file}'...",
        K::ProcessingArtist => "Processing artist: {name}",
        K::ProcessingSource => "Processing: {url}",
        K::ArtistIgnored => "Artist '{name}' ignored (missing name or tracks).",
        K::ImportJobFailed => "Could not import '{url}': {error}",
        K::ImportCompleted => "Import complete",
        K::ImportSourceMissing => {
            "You must provide a YAML file or at least one URL via --tune or --playlist."
        }
        K::RunSummary => {
            "{fetched} downloaded, {skipped} skipped, {deleted} deleted, {failed} failed."
        }
        K::Error => "Error: {error}",
    }
}

fn french(key: MessageKey) -> &'static str {
    use MessageKey as K;
    match key {
        K::AuthAttempt => "Tentative d'authentification auprès de Google...",
        K::AuthSuccess => "Authentification réussie. Jeton enregistré dans {path}.",
        K::LoggedOut => "Identifiants supprimés : {path}.",
        K::NotLoggedIn => "Aucun identifiant enregistré dans {path}.",
        K::CreatingPlaylist => "Création de la playlist '{name}' en cours...",
        K::PlaylistCreated => "Playlist '{playlist_name}' créée avec succès. URL : {playlist_url}",
        K::DeletingPlaylist => "Suppression de la playlist '{name}' en cours...",
        K::PlaylistDeleted => "Playlist '{playlist_name}' supprimée avec succès.",
        K::GettingUrl => "Récupération de l'URL pour la playlist '{name}'...",
        K::PlaylistShared => "URL de partage pour la playlist '{playlist_name}' : {playlist_url}",
        K::PreparingDownload => "Préparation du téléchargement de la playlist...",
        K::PreparingSync => "Préparation de la synchronisation de la playlist...",
        K::RemotePlaylistInfo => "La playlist distante '{title}' contient {count} morceaux.",
        K::LocalFolderInfo => "Le dossier local contient {count} morceaux.",
        K::FilesToDownload => "{count} nouveaux morceaux à télécharger.",
        K::FilesToDelete => "{count} morceaux locaux à supprimer.",
        K::FileExistsSkipping => "Le fichier '{file_path}' existe déjà, téléchargement ignoré.",
        K::NothingToDo => "Tout est à jour.",
        K::DryRun => "Simulation : aucune modification effectuée.",
        K::StartingDownload => "Démarrage du téléchargement...",
        K::StartingDeletion => "Démarrage de la suppression...",
        K::FileDownloaded => "Téléchargé : {name}",
        K::FileDownloadError => "Échec du téléchargement de {name} : {error}",
        K::FileDeleted => "Supprimé : {name}",
        K::FileDeletionError => "Échec de la suppression de {name} : {error}",
        K::DuplicateIdentity => "Attention : {detail}",
        K::Interrupted => "Interrompu : {count} morceaux n'ont pas été démarrés.",
        K::PlaylistDownloaded => "Playlist '{playlist_url}' téléchargée dans '{directory}'.",
        K::SyncCompleted => "Synchronisation terminée",
        K::ImportStarted => "Importation de la musique depuis '{yaml_file}'...",
        K::ProcessingArtist => "Téléchargement pour l'artiste : {name}",
        K::ProcessingSource => "Traitement : {url}",
        K::ArtistIgnored => "Artiste '{name}' ignoré (nom ou morceaux manquants).",
        K::ImportJobFailed => "Impossible d'importer '{url}' : {error}",
        K::ImportCompleted => "Importation terminée",
        K::ImportSourceMissing => {
            "Vous devez fournir un fichier YAML ou au moins une URL via --tune ou --playlist."
        }
        K::RunSummary => {
            "{fetched} téléchargés, {skipped} ignorés, {deleted} supprimés, {failed} en échec."
        }
        K::Error => "Erreur : {error}",
    }
}

/// Message renderer bound to one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    lang: Lang,
}

impl Messages {
    /// Renderer for `lang`.
    #[must_use]
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// Bound language.
    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Renders `key` with `(name, value)` arguments.
    #[must_use]
    pub fn render(&self, key: MessageKey, args: &[(&str, &dyn fmt::Display)]) -> String {
        render_template(key.template(self.lang), args)
    }

    /// Renders a message without arguments.
    #[must_use]
    pub fn text(&self, key: MessageKey) -> String {
        self.render(key, &[])
    }
}

fn render_template(template: &str, args: &[(&str, &dyn fmt::Display)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(&value.to_string()),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let en = Messages::new(Lang::En);
        assert_eq!(
            en.render(MessageKey::RemotePlaylistInfo, &[("title", &"Mix"), ("count", &3)]),
            "Remote playlist 'Mix' contains 3 tracks."
        );

        let fr = Messages::new(Lang::Fr);
        assert_eq!(
            fr.render(MessageKey::FilesToDelete, &[("count", &2)]),
            "2 morceaux locaux à supprimer."
        );
    }

    #[test]
    fn test_missing_placeholder_is_verbatim() {
        let en = Messages::new(Lang::En);
        assert_eq!(
            en.render(MessageKey::FileDeleted, &[]),
            "Deleted: {name}"
        );
        assert_eq!(render_template("open { brace", &[]), "open { brace");
    }

    #[test]
    fn test_locale_detection() {
        assert_eq!(Lang::from_locale("fr_FR.UTF-8"), Lang::Fr);
        assert_eq!(Lang::from_locale("FR"), Lang::Fr);
        assert_eq!(Lang::from_locale("en_US.UTF-8"), Lang::En);
        assert_eq!(Lang::from_locale("C"), Lang::En);
    }

    #[test]
    fn test_resolve_precedence() {
        assert_eq!(Lang::resolve(Some(Lang::Fr), Some(Lang::En)), Lang::Fr);
        assert_eq!(Lang::resolve(None, Some(Lang::Fr)), Lang::Fr);
    }

    #[test]
    fn test_parse_lang() {
        assert_eq!("FR".parse::<Lang>().unwrap(), Lang::Fr);
        assert!("de".parse::<Lang>().is_err());
    }

    #[test]
    fn test_catalogs_share_placeholders() {
        let keys = [
            MessageKey::PlaylistCreated,
            MessageKey::PlaylistShared,
            MessageKey::RemotePlaylistInfo,
            MessageKey::FileExistsSkipping,
            MessageKey::ImportJobFailed,
            MessageKey::RunSummary,
        ];
        for key in keys {
            let names = |lang| {
                let mut names: Vec<String> = key
                    .template(lang)
                    .split('{')
                    .skip(1)
                    .filter_map(|part| part.split_once('}').map(|(name, _)| name.to_string()))
                    .collect();
                names.sort();
                names
            };
            assert_eq!(names(Lang::En), names(Lang::Fr), "{key:?}");
        }
    }
}
