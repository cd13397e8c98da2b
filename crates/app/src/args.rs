use clap::Parser;
use url::Url;

use crate::Command;

#[derive(Parser, Debug)]
#[command(
    name = "wsio",
    about = "Workspaces storage: pluggable S3-compatible backends behind one path namespace",
    version
)]
pub struct Args {
    /// Base URL of the service API (default http://127.0.0.1:8100)
    #[arg(long, global = true, env = "WSIO_API_URL")]
    pub api_url: Option<Url>,

    #[command(subcommand)]
    pub command: Command,
}
