use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use rollaudit_core::{DieSpec, SampleSet};

use super::batch::{DEFAULT_CONCURRENCY, sample_batch};
use super::signal::StopSignal;
use crate::display::render_frame;
use crate::remote::RollService;

/// Rolls requested per loop iteration unless overridden.
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `None` runs until interrupted
    pub max_loops: Option<u32>,
    pub batch_size: usize,
    pub concurrency: usize,
    /// Pause after each frame; paces both the service load and the display
    pub delay: Duration,
    pub die: DieSpec,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_loops: Some(crate::config::DEFAULT_LOOPS),
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            delay: DEFAULT_DELAY,
            die: DieSpec::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub loops_completed: u32,
    pub samples: SampleSet,
    /// True when a stop request ended the run before `max_loops`
    pub interrupted: bool,
}

/// Sample batches until `max_loops` is reached or a stop is requested.
///
/// A stop request never cancels a batch in flight: the batch finishes, is
/// recorded and drawn, and the loop ends at the next iteration boundary.
/// Roll failures are data and never end the session.
pub async fn run_session<W: Write + ?Sized>(
    service: Arc<dyn RollService>,
    config: &SessionConfig,
    stop: &mut StopSignal,
    out: &mut W,
) -> io::Result<SessionSummary> {
    let mut samples = SampleSet::new();
    let mut loops_completed: u32 = 0;
    let mut interrupted = false;

    log::info!(
        "sampling {} x {} per batch with {} workers ({:?} between batches)",
        config.die.label,
        config.batch_size,
        config.concurrency,
        config.delay
    );

    loop {
        if stop.is_stopped() {
            interrupted = true;
            break;
        }
        if config.max_loops.is_some_and(|max| loops_completed >= max) {
            break;
        }

        let batch = sample_batch(
            Arc::clone(&service),
            config.batch_size,
            &config.die,
            config.concurrency,
        )
        .await;
        let failed = batch.iter().filter(|o| !o.is_success()).count();
        log::debug!(
            "batch {}: {} ok, {failed} failed",
            loops_completed + 1,
            batch.len() - failed
        );
        if failed > 0 && failed == batch.len() {
            log::warn!("every roll in batch {} failed", loops_completed + 1);
        }

        samples.extend(batch);
        loops_completed += 1;
        render_frame(out, loops_completed, config.max_loops, &samples)?;

        if config.max_loops.is_some_and(|max| loops_completed >= max) {
            break;
        }
        tokio::select! {
            () = tokio::time::sleep(config.delay) => {}
            () = stop.stopped() => {
                interrupted = true;
                break;
            }
        }
    }

    Ok(SessionSummary {
        loops_completed,
        samples,
        interrupted,
    })
}
