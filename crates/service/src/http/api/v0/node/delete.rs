use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::database::NodeQueryError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub name: String,
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;
    const PATH: &'static str = "/api/v0/node/delete";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<DeleteRequest>,
) -> Result<impl IntoResponse, DeleteError> {
    let deleted = state.database().delete_node(&req.name).await?;
    if !deleted {
        return Err(DeleteError::NotFound(req.name));
    }

    tracing::info!(name = %req.name, "deleted storage node and its roots");
    Ok(Json(DeleteResponse { name: req.name }))
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("unknown node: '{0}'")]
    NotFound(String),
    #[error("node query failed: {0}")]
    Query(#[from] NodeQueryError),
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        match &self {
            DeleteError::NotFound(_) => {
                (http::StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            DeleteError::Query(_) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response(),
        }
    }
}
