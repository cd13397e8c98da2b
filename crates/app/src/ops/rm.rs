use service::http::api::client::ApiError;
use service::http::api::v0::storage::rm::{RmRequest, RmResponse};

/// Delete an object
#[derive(clap::Args, Debug, Clone)]
pub struct Rm {
    /// Logical workspace path
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Rm {
    type Error = RmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: RmResponse = ctx
            .client
            .call(RmRequest {
                path: self.path.clone(),
            })
            .await?;

        Ok(format!("Removed {}", response.path))
    }
}
