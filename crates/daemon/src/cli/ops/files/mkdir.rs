use clap::Args;
use uuid::Uuid;

use common::prelude::NodeKind;
use filetree_daemon::http_server::api::files::{CreateRequest, NewNode};

use super::{parent_or_root, render_node, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    /// Folder name
    pub name: String,

    /// Parent folder (defaults to the top level)
    #[arg(long)]
    pub parent: Option<Uuid>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Mkdir {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let parent_id = parent_or_root(&mut client, self.parent).await?;
        let request = CreateRequest {
            parent_id,
            node: NewNode {
                name: self.name.clone(),
                kind: NodeKind::Folder,
                text: None,
            },
        };
        let node = client.call(request).await?;
        Ok(render_node(&node))
    }
}
