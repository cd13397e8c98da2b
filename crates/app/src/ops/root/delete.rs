use uuid::Uuid;

use service::http::api::client::ApiError;
use service::http::api::v0::root::delete::{DeleteRequest, DeleteResponse};

#[derive(clap::Args, Debug, Clone)]
pub struct Delete {
    /// Root id (from `wsio root list`)
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl Delete {
    pub async fn execute(&self, ctx: &crate::op::OpContext) -> Result<String, DeleteError> {
        let response: DeleteResponse = ctx.client.call(DeleteRequest { id: self.id }).await?;
        Ok(format!("Deleted root: {}", response.id))
    }
}
