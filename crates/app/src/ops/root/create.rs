use common::root::RootType;
use service::http::api::client::ApiError;
use service::http::api::v0::root::create::{CreateRequest, CreateResponse};

#[derive(clap::Args, Debug, Clone)]
pub struct Create {
    /// Bucket the root lives in
    pub bucket: String,
    /// Name of the node the root binds to
    pub node_name: String,

    /// Access-control default for workspaces under this root
    #[arg(long, value_enum)]
    pub root_type: RootType,
    /// Prefix within the bucket (default: the whole bucket)
    #[arg(long)]
    pub base_path: Option<String>,
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
                node_name: self.node_name.clone(),
                root_type: self.root_type,
                bucket: self.bucket.clone(),
                base_path: self.base_path.clone(),
            })
            .await?;

        let root = response.root;
        Ok(format!(
            "Created root: {}/{} ({}) on node {} (id: {})",
            root.bucket, root.base_path, root.root_type, self.node_name, root.id
        ))
    }
}
