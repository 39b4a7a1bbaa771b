//! Builds the library components a command needs from [`Settings`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use playlist_core::auth::{Credentials, Session};
use playlist_core::delete::FsDeleter;
use playlist_core::execute::PlanExecutor;
use playlist_core::fetch::{RetryPolicy, YtDlpFetcher};
use playlist_core::i18n::{MessageKey, Messages};
use playlist_core::source::{ApiPlaylistSource, PlaylistSource, SourceKind, YtDlpSource};
use playlist_core::youtube::{YouTubeClient, build_http_client};
use playlist_core::ytdlp::YtDlp;
use reqwest::Client;
use tracing::debug;

use crate::app::settings::Settings;
use crate::app::terminal::TerminalEnv;

pub(crate) struct RunContext {
    pub(crate) settings: Settings,
    pub(crate) messages: Messages,
    pub(crate) quiet: bool,
    pub(crate) interrupted: Arc<AtomicBool>,
}

/// Listing backend chosen for a run. The API variant owns the session so it
/// can be released once listing is done.
pub(crate) enum SourceHandle {
    YtDlp(YtDlpSource),
    Api(ApiPlaylistSource),
}

impl SourceHandle {
    pub(crate) fn as_dyn(&self) -> &dyn PlaylistSource {
        match self {
            Self::YtDlp(source) => source,
            Self::Api(source) => source,
        }
    }

    /// Persists a refreshed token, if any.
    pub(crate) fn finish(self) -> Result<()> {
        if let Self::Api(source) = self {
            source
                .into_session()
                .release()
                .context("Failed to persist the refreshed token")?;
        }
        Ok(())
    }
}

impl RunContext {
    pub(crate) fn new(settings: Settings, quiet: bool) -> Self {
        let messages = Messages::new(settings.lang);
        Self {
            settings,
            messages,
            quiet,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Prints a user-facing line unless quiet.
    pub(crate) fn say(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    pub(crate) fn ytdlp(&self) -> YtDlp {
        YtDlp::new(&self.settings.ytdlp_path)
    }

    pub(crate) fn http_client(&self) -> Result<Client> {
        build_http_client(self.settings.api_timeout).context("Failed to build HTTP client")
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(
            &self.settings.token_file,
            &self.settings.client_secrets_file,
        )
    }

    /// Loads, refreshes, or interactively obtains an API session.
    pub(crate) async fn session(&self, http: &Client) -> Result<Session> {
        let messages = self.messages;
        let session = Session::acquire(&self.credentials(), http, move |url| {
            eprintln!("{}", messages.text(MessageKey::AuthAttempt));
            eprintln!("{url}");
        })
        .await?;
        Ok(session)
    }

    pub(crate) async fn youtube(&self) -> Result<(YouTubeClient, Session)> {
        let http = self.http_client()?;
        let session = self.session(&http).await?;
        Ok((YouTubeClient::new(http), session))
    }

    pub(crate) async fn source(&self) -> Result<SourceHandle> {
        debug!(source = %self.settings.source, "selecting playlist source");
        match self.settings.source {
            SourceKind::YtDlp => Ok(SourceHandle::YtDlp(YtDlpSource::new(self.ytdlp()))),
            SourceKind::Api => {
                let (client, session) = self.youtube().await?;
                Ok(SourceHandle::Api(ApiPlaylistSource::new(client, session)))
            }
        }
    }

    pub(crate) fn executor(&self) -> Result<PlanExecutor> {
        let fetcher = YtDlpFetcher::new(self.ytdlp(), self.settings.audio_quality);
        let executor = PlanExecutor::new(
            Arc::new(fetcher),
            Arc::new(FsDeleter),
            self.settings.concurrency,
            RetryPolicy::with_max_attempts(self.settings.max_retries),
        )?
        .with_interrupt_flag(Arc::clone(&self.interrupted));
        Ok(executor)
    }

    /// Raises the interrupt flag on Ctrl-C.
    pub(crate) fn install_interrupt_handler(&self) {
        let interrupted = Arc::clone(&self.interrupted);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.store(true, Ordering::SeqCst);
            }
        });
    }

    pub(crate) fn use_spinner(&self) -> bool {
        TerminalEnv::detect().spinner(self.quiet)
    }
}
