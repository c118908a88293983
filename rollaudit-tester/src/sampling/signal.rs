use std::io;
use tokio::sync::watch;

/// Sender half of a cooperative stop request.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiver half, checked by the sampling loop between batches only.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn new() -> (StopHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (StopHandle { tx }, Self { rx })
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop has been requested. Never resolves if every
    /// handle was dropped without stopping.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Request a stop on the first Ctrl-C. A second Ctrl-C exits immediately
/// without waiting for the batch in flight.
pub fn stop_on_ctrl_c(handle: StopHandle) {
    tokio::spawn(watch_interrupts(handle, tokio::signal::ctrl_c, || {
        std::process::exit(130);
    }));
}

async fn watch_interrupts<F, Fut>(
    handle: StopHandle,
    mut next_interrupt: F,
    force_exit: impl FnOnce(),
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(err) = next_interrupt().await {
        log::warn!("unable to listen for Ctrl-C: {err}");
        return;
    }
    log::info!("interrupt received; stopping after the current batch (Ctrl-C again to quit)");
    handle.stop();

    if next_interrupt().await.is_ok() {
        log::warn!("second interrupt received; exiting without waiting for the batch");
        force_exit();
    }
}
