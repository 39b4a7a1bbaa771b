//! Bulk import handler: YAML declaration and/or `--playlist` / `--tune` URLs.

use anyhow::Result;
use playlist_core::i18n::MessageKey;
use playlist_core::import::{self, ImportError, ImportOptions};

use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::{exit_handler, progress};
use crate::cli::ImportArgs;
use crate::output;

pub(crate) async fn run_import_command(ctx: &RunContext, args: &ImportArgs) -> Result<ProcessExit> {
    let m = &ctx.messages;

    let plan = match import::plan_import(
        args.file.as_deref(),
        args.playlists.clone(),
        args.tunes.clone(),
    )
    .await
    {
        Ok(plan) => plan,
        Err(ImportError::NoSources) => {
            eprintln!("{}", m.text(MessageKey::ImportSourceMissing));
            return Ok(ProcessExit::Failure);
        }
        Err(error) => return Err(error.into()),
    };

    if let Some(file) = &args.file {
        ctx.say(&m.render(MessageKey::ImportStarted, &[("yaml_file", &file.display())]));
    }
    for name in &plan.ignored_artists {
        eprintln!("{}", m.render(MessageKey::ArtistIgnored, &[("name", name)]));
    }

    let options = ImportOptions {
        base_dir: ctx.settings.output_dir.clone(),
        flat: args.flat,
        green: args.green,
    };
    let source = ctx.source().await?;
    let executor = ctx.executor()?;
    ctx.install_interrupt_handler();

    let (handle, stop) = progress::spawn_progress_ui(ctx.use_spinner(), executor.stats(), None);
    let mut last_group = None;
    let result = import::run_import(source.as_dyn(), &executor, &plan, &options, |job| {
        output::print_import_job(ctx, job, &mut last_group);
    })
    .await;
    progress::stop_progress_ui(handle, &stop).await;
    source.finish()?;
    let report = result?;

    output::print_import_report(ctx, &report);
    if report.execution.interrupted {
        return Ok(ProcessExit::Failure);
    }
    ctx.say(&m.text(MessageKey::ImportCompleted));

    let execution = &report.execution;
    Ok(exit_handler::determine_exit_outcome(
        execution.fetched() + execution.skipped,
        report.failure_count(),
    ))
}
