use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use url::Url;

/// Environment variables consumed by the service.
const ENV_DATABASE_URL: &str = "WSIO_DATABASE_URL";
const ENV_LISTEN_ADDR: &str = "WSIO_LISTEN_ADDR";
const ENV_SEARCH_NODES: &str = "WSIO_SEARCH_NODES";
const ENV_WORKERS: &str = "WSIO_WORKERS";
const ENV_LOG_LEVEL: &str = "WSIO_LOG_LEVEL";

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug)]
pub struct Config {
    /// sqlite connection URI for the metadata store, if not set then an
    ///  in-memory database will be used
    pub database_url: Option<String>,

    /// address for the API server to listen on.
    ///  if not set then 0.0.0.0:8100 will be used
    pub listen_addr: SocketAddr,

    /// search engine node URIs, tried in order when indexing.
    ///  empty disables indexing entirely
    pub search_nodes: Vec<Url>,

    /// worker threads for the request runtime
    pub workers: usize,

    // logging
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8100),
            search_nodes: Vec::new(),
            workers: DEFAULT_WORKERS,
            log_level: tracing::Level::INFO,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {detail}")]
    Invalid { var: &'static str, detail: String },
}

impl ConfigError {
    fn invalid(var: &'static str, detail: impl ToString) -> Self {
        Self::Invalid {
            var,
            detail: detail.to_string(),
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            if !url.is_empty() {
                config.database_url = Some(url);
            }
        }

        if let Ok(addr) = std::env::var(ENV_LISTEN_ADDR) {
            config.listen_addr = addr
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_LISTEN_ADDR, e))?;
        }

        // A JSON array of node URIs, e.g. ["http://search1:9200"].
        if let Ok(nodes) = std::env::var(ENV_SEARCH_NODES) {
            let raw: Vec<String> = serde_json::from_str(&nodes)
                .map_err(|e| ConfigError::invalid(ENV_SEARCH_NODES, e))?;
            config.search_nodes = raw
                .iter()
                .map(|s| Url::parse(s))
                .collect::<Result<_, _>>()
                .map_err(|e| ConfigError::invalid(ENV_SEARCH_NODES, e))?;
        }

        if let Ok(workers) = std::env::var(ENV_WORKERS) {
            config.workers = workers
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_WORKERS, e))?;
        }

        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            config.log_level = level
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_LOG_LEVEL, e))?;
        }

        Ok(config)
    }
}
