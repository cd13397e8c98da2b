use std::net::SocketAddr;

use service::config::ConfigError;
use service::{spawn_service, ServiceConfig};

/// Run the workspaces storage daemon
#[derive(clap::Args, Debug, Clone)]
pub struct Daemon {
    /// Address for the API server (default 0.0.0.0:8100)
    #[arg(long)]
    pub listen_addr: Option<SocketAddr>,

    /// Metadata store URL, e.g. sqlite://wsio.db (default: in-memory)
    #[arg(long, env = "WSIO_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Worker threads for the request runtime
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid log level: '{0}'")]
    InvalidLogLevel(String),
}

impl Daemon {
    /// Environment config with CLI flags layered on top.
    pub fn build_config(&self) -> Result<ServiceConfig, DaemonError> {
        let mut config = ServiceConfig::from_env()?;

        if let Some(listen_addr) = self.listen_addr {
            config.listen_addr = listen_addr;
        }
        if let Some(database_url) = &self.database_url {
            config.database_url = Some(database_url.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level
                .parse()
                .map_err(|_| DaemonError::InvalidLogLevel(level.clone()))?;
        }

        Ok(config)
    }

    /// Worker count for the runtime `main` builds, if configuration allows
    /// deciding it up front.
    pub fn configured_workers(&self) -> Option<usize> {
        self.build_config().ok().map(|config| config.workers)
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = self.build_config()?;
        spawn_service(&config).await;
        Ok("daemon stopped".to_string())
    }
}
