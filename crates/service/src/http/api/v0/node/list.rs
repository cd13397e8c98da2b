use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::NodeSummary;
use crate::database::NodeQueryError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub nodes: Vec<NodeSummary>,
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;
    const PATH: &'static str = "/api/v0/node/list";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(_req): Json<ListRequest>,
) -> Result<impl IntoResponse, ListError> {
    let nodes = state.database().list_nodes().await?;
    Ok(Json(ListResponse {
        nodes: nodes.iter().map(NodeSummary::from).collect(),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("node query failed: {0}")]
    Query(#[from] NodeQueryError),
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
