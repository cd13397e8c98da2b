use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::database::{NodeQueryError, RootQueryError};
use crate::ServiceState;
use common::node::Node;
use common::resolver::ResolveError;
use common::root::Root;
use common::storage::{AccessError, StorageError};

pub mod get;
pub mod ls;
pub mod put;
pub mod resolve;
pub mod rm;
pub mod sign;

// Re-export for convenience
pub use get::GetRequest;
pub use ls::LsRequest;
pub use put::PutRequest;
pub use resolve::ResolveRequest;
pub use rm::RmRequest;
pub use sign::SignRequest;

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/resolve", post(resolve::handler))
        .route("/get", post(get::handler))
        .route("/put", post(put::handler))
        .route("/ls", post(ls::handler))
        .route("/rm", post(rm::handler))
        .route("/sign", post(sign::handler))
        .with_state(state)
}

/// A logical path pinned to its backend: node, root and effective sub-path.
#[derive(Debug)]
pub struct ResolvedPath {
    pub node: Node,
    pub root: Root,
    pub sub_path: String,
    /// Full object key within the root's bucket.
    pub object_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolvePathError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("root references a node that no longer exists")]
    MissingNode,
    #[error("root query failed: {0}")]
    Roots(#[from] RootQueryError),
    #[error("node query failed: {0}")]
    Nodes(#[from] NodeQueryError),
}

/// Resolve `path` against the current configuration.
///
/// Roots are re-read from the database on every call; configuration changes
/// are visible to the next request without any cache to invalidate.
pub(crate) async fn resolve_path(
    state: &ServiceState,
    path: &str,
) -> Result<ResolvedPath, ResolvePathError> {
    let roots = state.database().list_roots().await?;
    let resolved = common::resolver::resolve(&roots, path)?;

    let node = state
        .database()
        .get_node(&resolved.root.node_id)
        .await?
        .ok_or(ResolvePathError::MissingNode)?;

    let object_key = resolved.object_key();
    let root = resolved.root.clone();
    Ok(ResolvedPath {
        node,
        root,
        sub_path: resolved.sub_path,
        object_key,
    })
}

pub(crate) fn path_error_response(e: &ResolvePathError) -> Response {
    match e {
        ResolvePathError::Resolve(ResolveError::NoMatchingRoot(_)) => {
            (http::StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        ResolvePathError::Resolve(ResolveError::EmptyPath) => {
            (http::StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        _ => (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected error".to_string(),
        )
            .into_response(),
    }
}

pub(crate) fn access_error_response(e: &AccessError) -> Response {
    match e {
        AccessError::CredentialExchange { .. } => {
            (http::StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
        AccessError::Storage(StorageError::ObjectNotFound(_)) => {
            (http::StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        AccessError::Storage(StorageError::SignedUrlUnsupported) => {
            (http::StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        AccessError::Storage(_) => (
            http::StatusCode::BAD_GATEWAY,
            "storage backend error".to_string(),
        )
            .into_response(),
    }
}
