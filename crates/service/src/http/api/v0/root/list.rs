use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::database::RootQueryError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::root::Root;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub roots: Vec<Root>,
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;
    const PATH: &'static str = "/api/v0/root/list";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(_req): Json<ListRequest>,
) -> Result<impl IntoResponse, ListError> {
    let roots = state.database().list_roots().await?;
    Ok(Json(ListResponse { roots }))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("root query failed: {0}")]
    Query(#[from] RootQueryError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected error".to_string(),
        )
            .into_response()
    }
}
