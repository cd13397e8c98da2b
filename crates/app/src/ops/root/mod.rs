pub mod create;
pub mod delete;
pub mod list;

/// Manage workspace roots
#[derive(clap::Args, Debug, Clone)]
pub struct Root {
    #[command(subcommand)]
    pub command: RootCommand,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum RootCommand {
    /// Create a root on a node
    Create(create::Create),
    /// List roots
    List(list::List),
    /// Delete a root by id
    Delete(delete::Delete),
}

#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error(transparent)]
    Create(#[from] create::CreateError),
    #[error(transparent)]
    List(#[from] list::ListError),
    #[error(transparent)]
    Delete(#[from] delete::DeleteError),
}

#[async_trait::async_trait]
impl crate::op::Op for Root {
    type Error = RootError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        match &self.command {
            RootCommand::Create(op) => Ok(op.execute(ctx).await?),
            RootCommand::List(op) => Ok(op.execute(ctx).await?),
            RootCommand::Delete(op) => Ok(op.execute(ctx).await?),
        }
    }
}
