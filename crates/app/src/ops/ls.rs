use service::http::api::client::ApiError;
use service::http::api::v0::storage::ls::{LsRequest, LsResponse};

/// List objects under a logical path
#[derive(clap::Args, Debug, Clone)]
pub struct Ls {
    /// Logical workspace path prefix
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: LsResponse = ctx
            .client
            .call(LsRequest {
                path: self.path.clone(),
            })
            .await?;

        if response.objects.is_empty() {
            Ok(format!("No objects under {}", response.path))
        } else {
            let output = response
                .objects
                .iter()
                .map(|o| format!("{:>12}  {}  {}", o.size, o.last_modified, o.path))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(output)
        }
    }
}
