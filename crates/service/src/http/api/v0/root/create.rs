use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::database::{CreateRootError, CreateRootParams};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::root::{Root, RootType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Name of the node this root binds to
    pub node_name: String,
    pub root_type: RootType,
    pub bucket: String,
    /// Optional prefix within the bucket
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub root: Root,
}

impl ApiRequest for CreateRequest {
    type Response = CreateResponse;
    const PATH: &'static str = "/api/v0/root";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, CreateError> {
    if req.bucket.trim().is_empty() {
        return Err(CreateError::InvalidBucket);
    }

    let root = state
        .database()
        .create_root(CreateRootParams {
            node_name: req.node_name,
            root_type: req.root_type,
            bucket: req.bucket,
            base_path: req.base_path.unwrap_or_default(),
        })
        .await?;

    tracing::info!(
        root = %root.id,
        bucket = %root.bucket,
        base_path = %root.base_path,
        root_type = %root.root_type,
        "created root"
    );

    Ok((http::StatusCode::CREATED, Json(CreateResponse { root })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("bucket must not be empty")]
    InvalidBucket,
    #[error("root creation failed: {0}")]
    Create(#[from] CreateRootError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match &self {
            CreateError::InvalidBucket => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            CreateError::Create(CreateRootError::UnknownNode(_)) => {
                (http::StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            CreateError::Create(CreateRootError::PathConflict { .. }) => {
                (http::StatusCode::CONFLICT, self.to_string()).into_response()
            }
            CreateError::Create(_) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response(),
        }
    }
}
