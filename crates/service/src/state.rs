use std::sync::Arc;

use common::creds::StsClient;
use common::storage::NodeGateway;

use super::config::Config;
use super::database::{Database, DatabaseSetupError};
use super::search::SearchClient;

/// Main service state - orchestrates all components
#[derive(Clone)]
pub struct State {
    database: Database,
    gateway: Arc<NodeGateway>,
    search: Arc<SearchClient>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let database_url = config
            .database_url
            .clone()
            .unwrap_or_else(|| "sqlite::memory:".to_string());
        tracing::info!("Database URL: {:?}", database_url);
        let database = Database::connect(&database_url).await?;

        // 2. Setup the storage gateway with the STS credential provider
        let gateway = Arc::new(NodeGateway::new(Arc::new(StsClient::new())));

        // 3. Setup search indexing
        let search = Arc::new(SearchClient::new(config.search_nodes.clone()));
        if search.is_enabled() {
            tracing::info!(nodes = config.search_nodes.len(), "search indexing enabled");
        } else {
            tracing::info!("search indexing disabled, no nodes configured");
        }

        Ok(Self {
            database,
            gateway,
            search,
        })
    }

    /// State over an in-memory database, for tests.
    pub async fn ephemeral() -> Result<Self, StateSetupError> {
        Self::from_config(&Config {
            database_url: None,
            ..Config::default()
        })
        .await
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn gateway(&self) -> &NodeGateway {
        &self.gateway
    }

    pub fn search(&self) -> &SearchClient {
        &self.search
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("database setup error: {0}")]
    Database(#[from] DatabaseSetupError),
}
