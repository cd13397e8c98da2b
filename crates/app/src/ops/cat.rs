use base64::prelude::*;

use service::http::api::client::ApiError;
use service::http::api::v0::storage::get::{GetRequest, GetResponse};

/// Print an object's content
#[derive(clap::Args, Debug, Clone)]
pub struct Cat {
    /// Logical workspace path
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("malformed content in response: {0}")]
    MalformedContent(#[from] base64::DecodeError),
}

#[async_trait::async_trait]
impl crate::op::Op for Cat {
    type Error = CatError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: GetResponse = ctx
            .client
            .call(GetRequest {
                path: self.path.clone(),
            })
            .await?;

        let data = BASE64_STANDARD.decode(&response.content)?;
        Ok(String::from_utf8_lossy(&data).to_string())
    }
}
