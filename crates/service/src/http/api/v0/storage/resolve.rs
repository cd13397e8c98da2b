use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{path_error_response, resolve_path, ResolvePathError};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::root::RootType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Logical workspace path
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub node: String,
    pub bucket: String,
    pub root_id: Uuid,
    pub root_type: RootType,
    pub base_path: String,
    pub sub_path: String,
    pub object_key: String,
}

impl ApiRequest for ResolveRequest {
    type Response = ResolveResponse;
    const PATH: &'static str = "/api/v0/storage/resolve";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ResolveRequest>,
) -> Result<impl IntoResponse, ResolveError> {
    let resolved = resolve_path(&state, &req.path).await?;

    Ok(Json(ResolveResponse {
        node: resolved.node.name,
        bucket: resolved.root.bucket,
        root_id: resolved.root.id,
        root_type: resolved.root.root_type,
        base_path: resolved.root.base_path,
        sub_path: resolved.sub_path,
        object_key: resolved.object_key,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Path(#[from] ResolvePathError),
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        match self {
            ResolveError::Path(e) => path_error_response(&e),
        }
    }
}
