use service::http::api::client::ApiError;
use service::http::api::v0::node::delete::{DeleteRequest, DeleteResponse};

#[derive(clap::Args, Debug, Clone)]
pub struct Delete {
    /// Name of the node to delete
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl Delete {
    pub async fn execute(&self, ctx: &crate::op::OpContext) -> Result<String, DeleteError> {
        let response: DeleteResponse = ctx
            .client
            .call(DeleteRequest {
                name: self.name.clone(),
            })
            .await?;

        Ok(format!("Deleted node: {}", response.name))
    }
}
