use std::time::Duration;

use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{access_error_response, path_error_response, resolve_path, ResolvePathError};
use crate::http::api::client::ApiRequest;
use crate::ServiceState;
use common::storage::AccessError;

const DEFAULT_EXPIRES_SECS: u64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRequest {
    /// Logical workspace path
    pub path: String,
    /// HTTP method the URL should authorize, defaults to GET
    pub method: Option<String>,
    /// URL validity in seconds, defaults to one hour
    pub expires_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    pub url: Url,
    pub method: String,
    pub expires_secs: u64,
}

impl ApiRequest for SignRequest {
    type Response = SignResponse;
    const PATH: &'static str = "/api/v0/storage/sign";
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SignRequest>,
) -> Result<impl IntoResponse, SignError> {
    let method_str = req.method.unwrap_or_else(|| "GET".to_string());
    let method = http::Method::from_bytes(method_str.to_uppercase().as_bytes())
        .map_err(|_| SignError::InvalidMethod(method_str.clone()))?;
    let expires_secs = req.expires_secs.unwrap_or(DEFAULT_EXPIRES_SECS);

    let resolved = resolve_path(&state, &req.path).await?;

    let url = state
        .gateway()
        .signed_url(
            &resolved.node,
            &resolved.root.bucket,
            method.clone(),
            &resolved.object_key,
            Duration::from_secs(expires_secs),
        )
        .await?;

    Ok(Json(SignResponse {
        url,
        method: method.to_string(),
        expires_secs,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("invalid HTTP method: '{0}'")]
    InvalidMethod(String),
    #[error(transparent)]
    Path(#[from] ResolvePathError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl IntoResponse for SignError {
    fn into_response(self) -> Response {
        match self {
            SignError::InvalidMethod(_) => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            SignError::Path(e) => path_error_response(&e),
            SignError::Access(e) => access_error_response(&e),
        }
    }
}
