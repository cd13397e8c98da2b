use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{access_error_response, path_error_response, resolve_path, ResolvePathError};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::storage::AccessError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsRequest {
    /// Logical workspace path prefix
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub path: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsResponse {
    pub path: String,
    pub objects: Vec<ObjectEntry>,
}

impl ApiRequest for LsRequest {
    type Response = LsResponse;
    const PATH: &'static str = "/api/v0/storage/ls";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<LsRequest>,
) -> Result<impl IntoResponse, LsError> {
    let resolved = resolve_path(&state, &req.path).await?;

    let objects = state
        .gateway()
        .list(&resolved.node, &resolved.root.bucket, &resolved.object_key)
        .await?;

    Ok(Json(LsResponse {
        path: resolved.object_key,
        objects: objects
            .into_iter()
            .map(|o| ObjectEntry {
                path: o.key,
                size: o.size,
                last_modified: o.last_modified,
            })
            .collect(),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error(transparent)]
    Path(#[from] ResolvePathError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl IntoResponse for LsError {
    fn into_response(self) -> Response {
        match self {
            LsError::Path(e) => path_error_response(&e),
            LsError::Access(e) => access_error_response(&e),
        }
    }
}
