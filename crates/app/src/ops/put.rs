use std::path::PathBuf;

use base64::prelude::*;

use service::http::api::client::ApiError;
use service::http::api::v0::storage::put::{PutRequest, PutResponse};

/// Upload a local file to a logical path
#[derive(clap::Args, Debug, Clone)]
pub struct Put {
    /// Logical workspace path to store at
    pub path: String,
    /// Local file to upload
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error("cannot read {0:?}: {1}")]
    ReadFile(PathBuf, std::io::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Put {
    type Error = PutError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = tokio::fs::read(&self.file)
            .await
            .map_err(|e| PutError::ReadFile(self.file.clone(), e))?;

        let response: PutResponse = ctx
            .client
            .call(PutRequest {
                path: self.path.clone(),
                content: BASE64_STANDARD.encode(&data),
            })
            .await?;

        Ok(format!("Stored {} ({} bytes)", response.path, response.size))
    }
}
