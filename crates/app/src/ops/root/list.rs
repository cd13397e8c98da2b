use service::http::api::client::ApiError;
use service::http::api::v0::root::list::{ListRequest, ListResponse};

#[derive(clap::Args, Debug, Clone)]
pub struct List {}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl List {
    pub async fn execute(&self, ctx: &crate::op::OpContext) -> Result<String, ListError> {
        let response: ListResponse = ctx.client.call(ListRequest {}).await?;

        if response.roots.is_empty() {
            Ok("No roots configured".to_string())
        } else {
            let output = response
                .roots
                .iter()
                .map(|r| {
                    format!(
                        "{}/{} ({}) [id: {}]",
                        r.bucket, r.base_path, r.root_type, r.id
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            Ok(output)
        }
    }
}
