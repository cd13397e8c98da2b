mod utils;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http;
use crate::{ServiceConfig, ServiceState};

/// Run the service until shutdown: logging, state, API server.
pub async fn spawn_service(service_config: &ServiceConfig) {
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter = EnvFilter::builder()
        .with_default_directive(service_config.log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    utils::register_panic_logger();
    utils::report_build_info();

    let state = match ServiceState::from_config(service_config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("error creating server state: {}", e);
            std::process::exit(3);
        }
    };

    let (_graceful_waiter, shutdown_rx) = utils::graceful_shutdown_blocker();

    if let Err(e) = http::run_api(
        service_config.listen_addr,
        service_config.log_level,
        state,
        shutdown_rx,
    )
    .await
    {
        tracing::error!("API server failed: {}", e);
        std::process::exit(4);
    }

    tracing::info!("service stopped");
}
