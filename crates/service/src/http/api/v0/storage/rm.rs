use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::{access_error_response, path_error_response, resolve_path, ResolvePathError};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::storage::AccessError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmRequest {
    /// Logical workspace path
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmResponse {
    pub path: String,
}

impl ApiRequest for RmRequest {
    type Response = RmResponse;
    const PATH: &'static str = "/api/v0/storage/rm";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RmRequest>,
) -> Result<impl IntoResponse, RmError> {
    let resolved = resolve_path(&state, &req.path).await?;

    state
        .gateway()
        .delete(&resolved.node, &resolved.root.bucket, &resolved.object_key)
        .await?;

    tracing::info!(path = %resolved.object_key, node = %resolved.node.name, "deleted object");

    state
        .search()
        .delete_object(&resolved.node.name, &resolved.object_key)
        .await;

    Ok(Json(RmResponse {
        path: resolved.object_key,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error(transparent)]
    Path(#[from] ResolvePathError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl IntoResponse for RmError {
    fn into_response(self) -> Response {
        match self {
            RmError::Path(e) => path_error_response(&e),
            RmError::Access(e) => access_error_response(&e),
        }
    }
}
