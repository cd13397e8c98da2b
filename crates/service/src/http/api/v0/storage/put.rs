use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use base64::prelude::*;
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{access_error_response, path_error_response, resolve_path, ResolvePathError};
use crate::http::api::client::ApiRequest;
use crate::search::ObjectDocument;
use crate::ServiceState;
use common::storage::AccessError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    /// Logical workspace path
    pub path: String,
    /// Object content, base64-encoded
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutResponse {
    pub path: String,
    pub size: u64,
}

impl ApiRequest for PutRequest {
    type Response = PutResponse;
    const PATH: &'static str = "/api/v0/storage/put";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<PutRequest>,
) -> Result<impl IntoResponse, PutError> {
    let data = BASE64_STANDARD
        .decode(&req.content)
        .map_err(|e| PutError::InvalidContent(e.to_string()))?;
    let data = Bytes::from(data);
    let size = data.len() as u64;

    let resolved = resolve_path(&state, &req.path).await?;

    state
        .gateway()
        .put(
            &resolved.node,
            &resolved.root.bucket,
            &resolved.object_key,
            data,
        )
        .await?;

    tracing::info!(
        path = %resolved.object_key,
        node = %resolved.node.name,
        size,
        "stored object"
    );

    // Indexing is best-effort; the write has already succeeded.
    state
        .search()
        .index_object(&ObjectDocument {
            path: resolved.object_key.clone(),
            node: resolved.node.name.clone(),
            bucket: resolved.root.bucket.clone(),
            size,
            indexed_at: Utc::now(),
        })
        .await;

    Ok(Json(PutResponse {
        path: resolved.object_key,
        size,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error("invalid base64 content: {0}")]
    InvalidContent(String),
    #[error(transparent)]
    Path(#[from] ResolvePathError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl IntoResponse for PutError {
    fn into_response(self) -> Response {
        match self {
            PutError::InvalidContent(_) => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            PutError::Path(e) => path_error_response(&e),
            PutError::Access(e) => access_error_response(&e),
        }
    }
}
