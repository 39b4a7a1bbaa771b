//! CLI output formatting: plans, execution reports, and import summaries.

use std::path::Path;

use playlist_core::execute::{ExecutionReport, ItemOutcome};
use playlist_core::i18n::{MessageKey, Messages};
use playlist_core::identity::encode_file_name;
use playlist_core::import::{ImportJob, ImportReport};
use playlist_core::sync::PreparedSync;

use crate::app::context::RunContext;

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub(crate) fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending an ellipsis if truncated.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Plan overview before execution.
pub(crate) fn print_plan(ctx: &RunContext, prepared: &PreparedSync, destination: &Path) {
    let m = &ctx.messages;
    let plan = &prepared.plan;

    ctx.say(&m.render(
        MessageKey::RemotePlaylistInfo,
        &[
            ("title", &prepared.manifest.title),
            ("count", &prepared.manifest.len()),
        ],
    ));
    ctx.say(&m.render(MessageKey::LocalFolderInfo, &[("count", &prepared.local_tracks)]));

    let width = terminal_width();
    for track in &plan.to_skip {
        let path = destination.join(encode_file_name(track));
        let line = m.render(
            MessageKey::FileExistsSkipping,
            &[("file_path", &path.display())],
        );
        ctx.say(&truncate_to_width(&line, width));
    }
    for conflict in &prepared.conflicts {
        eprintln!("{}", m.render(MessageKey::DuplicateIdentity, &[("detail", conflict)]));
    }

    ctx.say(&m.render(MessageKey::FilesToDownload, &[("count", &plan.to_fetch.len())]));
    if !plan.to_delete.is_empty() {
        ctx.say(&m.render(MessageKey::FilesToDelete, &[("count", &plan.to_delete.len())]));
    }
}

/// Per-item lines plus the summary line. Failures always go to stderr.
pub(crate) fn print_execution(ctx: &RunContext, report: &ExecutionReport) {
    let m = &ctx.messages;
    for outcome in &report.outcomes {
        match outcome {
            ItemOutcome::Fetched { track, .. } => {
                ctx.say(&m.render(MessageKey::FileDownloaded, &[("name", &track.title)]));
            }
            ItemOutcome::FetchFailed { track, error, .. } => eprintln!(
                "{}",
                m.render(
                    MessageKey::FileDownloadError,
                    &[("name", &track.title), ("error", error)],
                )
            ),
            ItemOutcome::Deleted { file } => {
                ctx.say(&m.render(MessageKey::FileDeleted, &[("name", &file.display_name())]));
            }
            ItemOutcome::DeleteFailed { file, error } => eprintln!(
                "{}",
                m.render(
                    MessageKey::FileDeletionError,
                    &[("name", &file.display_name()), ("error", error)],
                )
            ),
            ItemOutcome::Cancelled { .. } => {}
        }
    }

    if report.interrupted {
        eprintln!(
            "{}",
            m.render(MessageKey::Interrupted, &[("count", &report.cancelled())])
        );
    }
    ctx.say(&summary_line(m, report));
}

pub(crate) fn summary_line(m: &Messages, report: &ExecutionReport) -> String {
    m.render(
        MessageKey::RunSummary,
        &[
            ("fetched", &report.fetched()),
            ("skipped", &report.skipped),
            ("deleted", &report.deleted()),
            ("failed", &report.failure_count()),
        ],
    )
}

/// Announces an import job as it starts, once per artist.
pub(crate) fn print_import_job(ctx: &RunContext, job: &ImportJob, last_group: &mut Option<String>) {
    let m = &ctx.messages;
    match &job.group {
        Some(group) if last_group.as_deref() != Some(group.as_str()) => {
            ctx.say(&m.render(MessageKey::ProcessingArtist, &[("name", group)]));
            *last_group = Some(group.clone());
        }
        Some(_) => {}
        None => {
            *last_group = None;
            ctx.say(&m.render(MessageKey::ProcessingSource, &[("url", job)]));
        }
    }
}

pub(crate) fn print_import_report(ctx: &RunContext, report: &ImportReport) {
    let m = &ctx.messages;
    for failed in &report.failed {
        eprintln!(
            "{}",
            m.render(
                MessageKey::ImportJobFailed,
                &[("url", &failed.job), ("error", &failed.error)],
            )
        );
    }
    print_execution(ctx, &report.execution);
}
