use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::RootQueryError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: Uuid,
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;
    const PATH: &'static str = "/api/v0/root/delete";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<DeleteRequest>,
) -> Result<impl IntoResponse, DeleteError> {
    let deleted = state.database().delete_root(&req.id).await?;
    if !deleted {
        return Err(DeleteError::NotFound(req.id));
    }

    tracing::info!(root = %req.id, "deleted root");
    Ok(Json(DeleteResponse { id: req.id }))
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("unknown root: {0}")]
    NotFound(Uuid),
    #[error("root query failed: {0}")]
    Query(#[from] RootQueryError),
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
