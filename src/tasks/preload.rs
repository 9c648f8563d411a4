//! Preload Tasks
//!
//! Timers that run preload work after a delay without blocking the caller.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::prefetch::{PrefetchScheduler, PreloadTiers};

/// Runs `work` on the runtime after `delay`, fire-and-forget.
///
/// No handle is kept: if nobody needs the result any more the work still
/// runs and is merely wasted. `work` must deal with its own failures.
///
/// Must be called from within a tokio runtime.
pub fn spawn_delayed<F>(delay: Duration, work: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        work.await;
    });
}

/// Spawns the startup warm-up: after `delay`, preloads `tiers` by priority.
///
/// All tiers run inside the one task.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the
/// warm-up during graceful shutdown.
pub fn spawn_warmup_task(
    scheduler: PrefetchScheduler,
    tiers: PreloadTiers,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Warm-up of {} modules starts in {}ms",
            tiers.total(),
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;

        let summary = scheduler.preload_tiered(&tiers).await;
        info!(
            loaded = summary.loaded.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "Warm-up finished"
        );
    })
}
