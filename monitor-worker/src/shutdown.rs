use monitor_core::Result;
use tokio::sync::watch;

/// Creates a linked trigger/listener pair.
pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

/// Requests a shutdown. Dropping the handle counts as a request too.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        let stopped = *self.rx.borrow();
        stopped || self.rx.has_changed().is_err()
    }

    /// Resolves once a shutdown has been requested.
    pub async fn wait(&mut self) {
        // An error means the handle is gone, which is a shutdown as well.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Waits for Ctrl-C, or SIGTERM on Unix.
pub async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
