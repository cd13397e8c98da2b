use url::Url;

use service::http::api::client::ApiError;
use service::http::api::v0::node::create::{CreateRequest, CreateResponse};

#[derive(clap::Args, Debug, Clone)]
pub struct Create {
    /// Unique name for the node
    pub name: String,
    /// S3-compatible API endpoint, e.g. http://localhost:9000
    pub endpoint: Url,
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,

    /// Dedicated STS endpoint for the token exchange
    #[arg(long)]
    pub sts_api_url: Option<Url>,
    /// Region name (default us-east-1)
    #[arg(long)]
    pub region_name: Option<String>,
    /// Role ARN to assume for temporary credentials; marks the node as
    /// cloud-backed
    #[arg(long)]
    pub role_arn: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl Create {
    pub async fn execute(&self, ctx: &crate::op::OpContext) -> Result<String, CreateError> {
        let response: CreateResponse = ctx
            .client
            .call(CreateRequest {
                name: self.name.clone(),
                endpoint: self.endpoint.clone(),
                access_key_id: self.access_key.clone(),
                secret_access_key: self.secret_key.clone(),
                region: self.region_name.clone(),
                sts_api_url: self.sts_api_url.clone(),
                role_arn: self.role_arn.clone(),
            })
            .await?;

        Ok(format!(
            "Created node: {} ({}) at {}",
            response.node.name, response.node.backend_kind, response.node.endpoint
        ))
    }
}
