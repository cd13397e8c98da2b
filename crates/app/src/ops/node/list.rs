use service::http::api::client::ApiError;
use service::http::api::v0::node::list::{ListRequest, ListResponse};

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

        if response.nodes.is_empty() {
            Ok("No nodes registered".to_string())
        } else {
            let output = response
                .nodes
                .iter()
                .map(|n| {
                    format!(
                        "{} ({} | {} | {})",
                        n.name, n.backend_kind, n.region, n.endpoint
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            Ok(output)
        }
    }
}
