use axum::routing::post;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::ServiceState;
use common::node::Node;

pub mod create;
pub mod delete;
pub mod list;

// Re-export for convenience
pub use create::CreateRequest;
pub use delete::DeleteRequest;
pub use list::ListRequest;

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", post(create::handler))
        .route("/list", post(list::handler))
        .route("/delete", post(delete::handler))
        .with_state(state)
}

/// Node as reported by the API. Credentials never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: Uuid,
    pub name: String,
    pub endpoint: Url,
    pub region: String,
    pub backend_kind: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            endpoint: node.endpoint.clone(),
            region: node.region.clone(),
            backend_kind: node.kind.as_str().to_string(),
            created_at: node.created_at,
        }
    }
}
