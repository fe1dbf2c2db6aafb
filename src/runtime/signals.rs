use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel `shutdown` on the first SIGINT (Ctrl+C) or SIGTERM, and `force` on the second.
///
/// The task ends after the second signal or once `force` is cancelled by the caller.
pub fn cancel_on_signal(shutdown: CancellationToken, force: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            name = next_signal() => {
                info!(target: "eventura_devkit::runtime", signal = name, "Received shutdown signal");
            }
            _ = force.cancelled() => return,
        }
        println!();
        println!("Received interrupt signal");
        shutdown.cancel();

        tokio::select! {
            name = next_signal() => {
                warn!(target: "eventura_devkit::runtime", signal = name, "Received second signal; killing processes");
            }
            _ = force.cancelled() => return,
        }
        println!("Received second interrupt signal, killing processes");
        force.cancel();
    })
}

async fn next_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(
                target: "eventura_devkit::runtime",
                error = %err,
                "Failed to install Ctrl+C handler"
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(
                    target: "eventura_devkit::runtime",
                    error = %err,
                    "Failed to install SIGTERM handler"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
