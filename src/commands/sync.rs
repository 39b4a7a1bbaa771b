//! Download and mirror-sync command handlers.

use std::path::Path;

use anyhow::{Context, Result};
use playlist_core::i18n::MessageKey;
use playlist_core::reconcile::ReconcilePolicy;
use playlist_core::source::PlaylistRef;
use playlist_core::sync;
use tracing::info;

use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::{exit_handler, progress};
use crate::cli::{DownloadArgs, SyncArgs};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncMode {
    Download,
    Mirror { dry_run: bool },
}

pub(crate) async fn run_download_command(ctx: &RunContext, args: &DownloadArgs) -> Result<ProcessExit> {
    ctx.say(&ctx.messages.text(MessageKey::PreparingDownload));
    run_playlist(ctx, &args.url, ReconcilePolicy::download(args.green), SyncMode::Download).await
}

pub(crate) async fn run_sync_command(ctx: &RunContext, args: &SyncArgs) -> Result<ProcessExit> {
    ctx.say(&ctx.messages.text(MessageKey::PreparingSync));
    let policy = sync_policy(args.keep_orphans);
    let mode = SyncMode::Mirror {
        dry_run: args.dry_run,
    };
    run_playlist(ctx, &args.url, policy, mode).await
}

fn sync_policy(keep_orphans: bool) -> ReconcilePolicy {
    if keep_orphans {
        ReconcilePolicy {
            delete_orphans: false,
            skip_existing: true,
        }
    } else {
        ReconcilePolicy::mirror()
    }
}

async fn run_playlist(
    ctx: &RunContext,
    url: &str,
    policy: ReconcilePolicy,
    mode: SyncMode,
) -> Result<ProcessExit> {
    let m = &ctx.messages;
    let playlist = PlaylistRef::parse(url)?;
    let destination = ctx.settings.output_dir.as_path();

    let source = ctx.source().await?;
    let prepared = sync::prepare(source.as_dyn(), &playlist, destination, policy)
        .await
        .with_context(|| format!("Failed to prepare {}", playlist.url()))?;
    source.finish()?;

    output::print_plan(ctx, &prepared, destination);

    if mode == (SyncMode::Mirror { dry_run: true }) {
        ctx.say(&m.text(MessageKey::DryRun));
        return Ok(ProcessExit::Success);
    }
    if prepared.plan.is_noop() {
        ctx.say(&m.text(MessageKey::NothingToDo));
        return Ok(ProcessExit::Success);
    }

    create_destination(destination)?;
    let executor = ctx.executor()?;
    ctx.install_interrupt_handler();

    ctx.say(&m.text(MessageKey::StartingDownload));
    if !prepared.plan.to_delete.is_empty() {
        ctx.say(&m.text(MessageKey::StartingDeletion));
    }

    let (handle, stop) = progress::spawn_progress_ui(
        ctx.use_spinner(),
        executor.stats(),
        Some(prepared.plan.action_count()),
    );
    let result = executor.execute(&prepared.plan, destination).await;
    progress::stop_progress_ui(handle, &stop).await;
    let report = result?;

    output::print_execution(ctx, &report);
    if !report.interrupted {
        match mode {
            SyncMode::Download => ctx.say(&m.render(
                MessageKey::PlaylistDownloaded,
                &[
                    ("playlist_url", &playlist.url()),
                    ("directory", &destination.display()),
                ],
            )),
            SyncMode::Mirror { .. } => ctx.say(&m.text(MessageKey::SyncCompleted)),
        }
    }

    Ok(exit_handler::outcome_for_report(&report))
}

fn create_destination(destination: &Path) -> Result<()> {
    if !destination.exists() {
        std::fs::create_dir_all(destination).with_context(|| {
            format!("Failed to create output directory {}", destination.display())
        })?;
        info!(dir = %destination.display(), "Created output directory");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_policy_mirrors_by_default() {
        assert_eq!(sync_policy(false), ReconcilePolicy::mirror());
    }

    #[test]
    fn test_sync_policy_keep_orphans_never_deletes() {
        let policy = sync_policy(true);
        assert!(!policy.delete_orphans);
        assert!(policy.skip_existing);
    }
}
