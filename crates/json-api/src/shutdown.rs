//! Graceful server shutdown on SIGINT or SIGTERM.

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

/// Could not register an OS signal handler.
#[derive(Debug, Error)]
#[error("failed to install {signal} handler: {source}")]
pub(crate) struct SignalHandlerError {
    signal: &'static str,
    #[source]
    source: io::Error,
}

/// Waits for a termination signal, then tells the server to stop accepting
/// connections and drain the in-flight ones.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), SignalHandlerError> {
    let signal = termination_signal().await?;

    info!("{signal} received, draining connections");

    handle.stop_graceful(None);

    Ok(())
}

#[cfg(unix)]
async fn termination_signal() -> Result<&'static str, SignalHandlerError> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(
        |source| SignalHandlerError {
            signal: "SIGTERM",
            source,
        },
    )?;

    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(|source| SignalHandlerError {
                signal: "Ctrl+C",
                source,
            })?;

            Ok("SIGINT")
        }
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(windows)]
async fn termination_signal() -> Result<&'static str, SignalHandlerError> {
    signal::ctrl_c()
        .await
        .map_err(|source| SignalHandlerError {
            signal: "Ctrl+C",
            source,
        })?;

    Ok("Ctrl+C")
}
