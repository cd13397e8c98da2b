use service::http::api::client::ApiError;
use service::http::api::v0::storage::sign::{SignRequest, SignResponse};

/// Presign a URL for direct access to an object
#[derive(clap::Args, Debug, Clone)]
pub struct Sign {
    /// Logical workspace path
    pub path: String,

    /// HTTP method the URL should authorize
    #[arg(long, default_value = "GET")]
    pub method: String,
    /// Validity in seconds
    #[arg(long, default_value_t = 3600)]
    pub expires: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Sign {
    type Error = SignError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: SignResponse = ctx
            .client
            .call(SignRequest {
                path: self.path.clone(),
                method: Some(self.method.clone()),
                expires_secs: Some(self.expires),
            })
            .await?;

        Ok(format!(
            "{} {} (valid {}s)",
            response.method, response.url, response.expires_secs
        ))
    }
}
