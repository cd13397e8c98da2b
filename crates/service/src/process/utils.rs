use tokio::sync::watch;

/// Route panics through tracing so they land in the same sink as everything
/// else.
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(location) => {
            tracing::error!(
                message = %panic,
                panic.file = location.file(),
                panic.line = location.line(),
                panic.column = location.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}

pub fn report_build_info() {
    tracing::info!(version = %common::version::build_info(), "starting wsio service");
}

/// Watch channel that fires on ctrl-c.
pub fn graceful_shutdown_blocker() -> (tokio::task::JoinHandle<()>, watch::Receiver<()>) {
    let (tx, rx) = watch::channel(());
    let handle = tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        let _ = tx.send(());
    });
    (handle, rx)
}
