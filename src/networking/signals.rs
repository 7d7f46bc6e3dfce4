use tokio::signal;
use tracing::{event, Level};

#[cfg(unix)]
pub async fn signal_for_shutdown() {
    use signal::unix::{signal, SignalKind};

    let (mut interrupt_signal, mut terminate_signal, mut quit_signal) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
        signal(SignalKind::quit()),
    ) {
        (Ok(interrupt), Ok(terminate), Ok(quit)) => (interrupt, terminate, quit),
        _ => {
            event!(
                Level::WARN,
                "could not install unix signal handlers, only ctrl-c will stop the server"
            );
            signal::ctrl_c().await.ok();
            return;
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => (),
        _ = interrupt_signal.recv() => (),
        _ = terminate_signal.recv() => (),
        _ = quit_signal.recv() => (),
    }
    event!(Level::INFO, "shutdown signal received");
}

#[cfg(not(unix))]
pub async fn signal_for_shutdown() {
    signal::ctrl_c().await.ok();
    event!(Level::INFO, "shutdown signal received");
}
