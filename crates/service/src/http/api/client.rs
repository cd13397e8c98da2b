//! Typed client for the service API.
//!
//! Each request type names its own route and response type, so callers get
//! `client.call(request)` with full type checking on both sides.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// A request the API client knows how to send.
pub trait ApiRequest: Serialize {
    type Response: DeserializeOwned;
    const PATH: &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn call<R: ApiRequest>(&self, request: R) -> Result<R::Response, ApiError> {
        let url = self.base_url.join(R::PATH)?;
        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ApiError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}
