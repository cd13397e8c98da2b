use service::http::api::client::ApiError;
use service::http::api::v0::storage::resolve::{ResolveRequest, ResolveResponse};

/// Show which node and bucket a logical path resolves to
#[derive(clap::Args, Debug, Clone)]
pub struct Resolve {
    /// Logical workspace path
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Resolve {
    type Error = ResolveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: ResolveResponse = ctx
            .client
            .call(ResolveRequest {
                path: self.path.clone(),
            })
            .await?;

        Ok(format!(
            "{} -> node {} bucket {} ({}) sub-path '{}'",
            response.object_key,
            response.node,
            response.bucket,
            response.root_type,
            response.sub_path
        ))
    }
}
