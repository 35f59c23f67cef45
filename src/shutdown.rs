//! Stop-after-current-file handling for SIGINT, SIGTERM and SIGHUP.
//!
//! OS signals are forwarded by name into a channel. [`watch`] turns the first
//! one into a cancelled [`CancellationToken`], which the organizer checks
//! before starting each file, so an in-flight move or delete always
//! completes. A second signal aborts the process with status 130.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Exit status for an aborted run (128 + SIGINT).
const FORCED_EXIT_STATUS: i32 = 130;

/// Start listening for signals and return the token the first one cancels.
pub(crate) fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(forward_signals(tx));

    let watched = token.clone();
    tokio::spawn(async move {
        if watch(&watched, rx).await {
            std::process::exit(FORCED_EXIT_STATUS);
        }
    });

    token
}

/// Consume signal names until the channel closes or a second signal arrives.
///
/// Returns `true` when the caller should abort immediately.
async fn watch(token: &CancellationToken, mut signals: mpsc::UnboundedReceiver<&'static str>) -> bool {
    let Some(first) = signals.recv().await else {
        return false;
    };
    tracing::info!("Received {}, stopping after the current file", first);
    tracing::info!("Send it again to abort immediately");
    token.cancel();

    match signals.recv().await {
        Some(second) => {
            tracing::warn!("Received {} again, aborting", second);
            true
        }
        None => false,
    }
}

#[cfg(unix)]
async fn forward_signals(tx: mpsc::UnboundedSender<&'static str>) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sighup) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
    ) {
        (Ok(term), Ok(hup)) => (term, hup),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Cannot listen for SIGTERM/SIGHUP ({}), only Ctrl+C stops the run", e);
            forward_ctrl_c(tx).await;
            return;
        }
    };

    loop {
        let name = tokio::select! {
            r = tokio::signal::ctrl_c() => match r {
                Ok(()) => "SIGINT",
                Err(_) => return,
            },
            r = sigterm.recv() => match r {
                Some(()) => "SIGTERM",
                None => return,
            },
            r = sighup.recv() => match r {
                Some(()) => "SIGHUP",
                None => return,
            },
        };
        if tx.send(name).is_err() {
            return;
        }
    }
}

#[cfg(not(unix))]
async fn forward_signals(tx: mpsc::UnboundedSender<&'static str>) {
    forward_ctrl_c(tx).await;
}

async fn forward_ctrl_c(tx: mpsc::UnboundedSender<&'static str>) {
    while tokio::signal::ctrl_c().await.is_ok() {
        if tx.send("Ctrl+C").is_err() {
            return;
        }
    }
}
