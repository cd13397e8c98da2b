use std::time::Duration;

use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use super::NodeSummary;
use crate::database::{CreateNodeError, CreateNodeParams};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::node::DEFAULT_REGION;

const ENDPOINT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Unique node name
    pub name: String,
    /// S3-compatible API endpoint
    pub endpoint: Url,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Region, defaults to us-east-1
    pub region: Option<String>,
    /// Dedicated STS endpoint for the token exchange
    pub sts_api_url: Option<Url>,
    /// Role assumed for session credentials; makes the node cloud-backed
    pub role_arn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub node: NodeSummary,
}

impl ApiRequest for CreateRequest {
    type Response = CreateResponse;
    const PATH: &'static str = "/api/v0/node";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, CreateError> {
    if req.name.trim().is_empty() {
        return Err(CreateError::InvalidName);
    }
    if req.sts_api_url.is_some() && req.role_arn.is_none() {
        return Err(CreateError::InvalidFederation(
            "sts_api_url requires a role_arn".to_string(),
        ));
    }

    validate_endpoint(&req.endpoint).await?;

    let node = state
        .database()
        .create_node(CreateNodeParams {
            name: req.name,
            endpoint: req.endpoint,
            region: req.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key_id: req.access_key_id,
            secret_access_key: req.secret_access_key,
            sts_api_url: req.sts_api_url,
            role_arn: req.role_arn,
        })
        .await?;

    tracing::info!(
        name = %node.name,
        endpoint = %node.endpoint,
        kind = node.kind.as_str(),
        "registered storage node"
    );

    Ok((
        http::StatusCode::CREATED,
        Json(CreateResponse {
            node: NodeSummary::from(&node),
        }),
    )
        .into_response())
}

/// Probe the endpoint before persisting anything. Any HTTP answer counts;
/// bare S3 endpoints return 403 at `/` without credentials.
async fn validate_endpoint(endpoint: &Url) -> Result<(), CreateError> {
    let client = reqwest::Client::builder()
        .timeout(ENDPOINT_PROBE_TIMEOUT)
        .build()
        .map_err(|e| CreateError::UnreachableEndpoint {
            endpoint: endpoint.clone(),
            detail: e.to_string(),
        })?;

    client
        .get(endpoint.clone())
        .send()
        .await
        .map(|_| ())
        .map_err(|e| CreateError::UnreachableEndpoint {
            endpoint: endpoint.clone(),
            detail: e.to_string(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("node name must not be empty")]
    InvalidName,
    #[error("invalid federation parameters: {0}")]
    InvalidFederation(String),
    #[error("unreachable endpoint {endpoint}: {detail}")]
    UnreachableEndpoint { endpoint: Url, detail: String },
    #[error("node creation failed: {0}")]
    Create(#[from] CreateNodeError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match &self {
            CreateError::InvalidName | CreateError::InvalidFederation(_) => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            CreateError::UnreachableEndpoint { .. } => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            CreateError::Create(CreateNodeError::DuplicateName(_)) => {
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
