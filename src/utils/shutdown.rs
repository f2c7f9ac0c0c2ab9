use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};
use tokio::select;
use tokio::sync::watch::{self, Receiver, Sender};
use tracing::info;

/// Shutdown flag shared by the background tasks, false until shutdown.
pub fn channel() -> (Sender<bool>, Receiver<bool>) {
    watch::channel(false)
}

/// Resolve on SIGINT or SIGTERM, then flip the shutdown flag.
pub async fn wait_for_signal(shutdown: Sender<bool>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    select! {
        _ = sigint.recv() => {
            info!("Received SIGINT (Ctrl+C). Initiating graceful shutdown...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM. Initiating graceful shutdown...");
        }
    }
    let _ = shutdown.send(true);
    Ok(())
}
