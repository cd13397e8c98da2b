pub mod create;
pub mod delete;
pub mod list;

/// Manage storage nodes
#[derive(clap::Args, Debug, Clone)]
pub struct Node {
    #[command(subcommand)]
    pub command: NodeCommand,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum NodeCommand {
    /// Register a new storage node
    Create(create::Create),
    /// List registered nodes
    List(list::List),
    /// Delete a node and its roots
    Delete(delete::Delete),
}

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error(transparent)]
    Create(#[from] create::CreateError),
    #[error(transparent)]
    List(#[from] list::ListError),
    #[error(transparent)]
    Delete(#[from] delete::DeleteError),
}

#[async_trait::async_trait]
impl crate::op::Op for Node {
    type Error = NodeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        match &self.command {
            NodeCommand::Create(op) => Ok(op.execute(ctx).await?),
            NodeCommand::List(op) => Ok(op.execute(ctx).await?),
            NodeCommand::Delete(op) => Ok(op.execute(ctx).await?),
        }
    }
}
