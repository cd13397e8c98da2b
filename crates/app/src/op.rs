use service::http::api::client::ApiClient;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8100";

/// Generates the top-level `Command` enum and its dispatcher. Each listed op
/// implements [`Op`]; errors are flattened to their display form for `main`.
macro_rules! command_enum {
    ($(($variant:ident, $ty:ty)),* $(,)?) => {
        #[derive(Debug, clap::Subcommand)]
        pub enum Command {
            $( $variant($ty), )*
        }

        impl Command {
            pub async fn execute(&self, ctx: &crate::op::OpContext) -> Result<String, String> {
                match self {
                    $(
                        Command::$variant(op) => crate::op::Op::execute(op, ctx)
                            .await
                            .map(|output| output.to_string())
                            .map_err(|e| e.to_string()),
                    )*
                }
            }
        }
    };
}

/// A single CLI operation, executed against the service API.
#[async_trait::async_trait]
pub trait Op {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output: std::fmt::Display;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum OpContextError {
    #[error("invalid API url: {0}")]
    InvalidApiUrl(#[from] url::ParseError),
}

/// Shared context for ops: the typed API client.
pub struct OpContext {
    pub client: ApiClient,
}

impl OpContext {
    pub fn new(api_url: Option<Url>) -> Result<Self, OpContextError> {
        let base_url = match api_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_API_URL)?,
        };
        Ok(Self {
            client: ApiClient::new(base_url),
        })
    }
}
