use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use base64::prelude::*;
use serde::{Deserialize, Serialize};

use super::{access_error_response, path_error_response, resolve_path, ResolvePathError};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::storage::AccessError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    /// Logical workspace path
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub path: String,
    pub size: u64,
    /// Object content, base64-encoded
    pub content: String,
}

impl ApiRequest for GetRequest {
    type Response = GetResponse;
    const PATH: &'static str = "/api/v0/storage/get";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<GetRequest>,
) -> Result<impl IntoResponse, GetError> {
    let resolved = resolve_path(&state, &req.path).await?;

    let data = state
        .gateway()
        .get(&resolved.node, &resolved.root.bucket, &resolved.object_key)
        .await?;

    Ok(Json(GetResponse {
        path: resolved.object_key,
        size: data.len() as u64,
        content: BASE64_STANDARD.encode(&data),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error(transparent)]
    Path(#[from] ResolvePathError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl IntoResponse for GetError {
    fn into_response(self) -> Response {
        match self {
            GetError::Path(e) => path_error_response(&e),
            GetError::Access(e) => access_error_response(&e),
        }
    }
}
