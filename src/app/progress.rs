//! Progress UI (spinner) for plan execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use playlist_core::ExecutionStats;

/// Spawns the spinner when requested.
///
/// Returns `(handle, stop)`; set `stop` and await the handle to clear the
/// line. When `use_spinner` is false the handle is `None` and `stop` is
/// already set. `total` is `None` when the amount of work is not known up
/// front (bulk imports).
pub(crate) fn spawn_progress_ui(
    use_spinner: bool,
    stats: Arc<ExecutionStats>,
    total: Option<usize>,
) -> (Option<tokio::task::JoinHandle<()>>, Arc<AtomicBool>) {
    if !use_spinner {
        return (None, Arc::new(AtomicBool::new(true)));
    }
    let stop = Arc::new(AtomicBool::new(false));
    let handle = spawn_spinner_inner(stats, total, Arc::clone(&stop));
    (Some(handle), stop)
}

/// Waits for the spinner to clear its line.
pub(crate) async fn stop_progress_ui(
    handle: Option<tokio::task::JoinHandle<()>>,
    stop: &AtomicBool,
) {
    stop.store(true, Ordering::SeqCst);
    if let Some(handle) = handle {
        let _ = handle.await;
    }
}

fn spawn_spinner_inner(
    stats: Arc<ExecutionStats>,
    total: Option<usize>,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        while !stop.load(Ordering::SeqCst) {
            spinner.set_message(progress_message(&stats, total));
            tokio::time::sleep(Duration::from_millis(120)).await;
        }

        spinner.finish_and_clear();
    })
}

fn progress_message(stats: &ExecutionStats, total: Option<usize>) -> String {
    let done = stats.done();
    let failed = match stats.failed() {
        0 => String::new(),
        n => format!(", {n} failed"),
    };
    match total {
        Some(total) => format!("[{}/{total}] Downloading...{failed}", done.min(total)),
        None => format!("[{done}] Downloading...{failed}"),
    }
}
