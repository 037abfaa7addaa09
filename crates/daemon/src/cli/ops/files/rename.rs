use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::{UpdateOperation, UpdateRequest};

use super::{render_node, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Rename {
    pub id: Uuid,
    /// New name
    pub name: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rename {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let request = UpdateRequest {
            id: self.id,
            operation: UpdateOperation::Rename {
                name: self.name.clone(),
            },
        };
        let node = client.call(request).await?;
        Ok(render_node(&node))
    }
}
