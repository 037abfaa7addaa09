use clap::Args;
use uuid::Uuid;

use common::prelude::NodeKind;
use filetree_daemon::http_server::api::files::{CreateRequest, NewNode};

use super::{parent_or_root, render_node, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Touch {
    /// File name
    pub name: String,

    /// Parent folder (defaults to the top level)
    #[arg(long)]
    pub parent: Option<Uuid>,

    /// Inline text content
    #[arg(long)]
    pub text: Option<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Touch {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let parent_id = parent_or_root(&mut client, self.parent).await?;
        let request = CreateRequest {
            parent_id,
            node: NewNode {
                name: self.name.clone(),
                kind: NodeKind::File,
                text: self.text.clone(),
            },
        };
        let node = client.call(request).await?;
        Ok(render_node(&node))
    }
}
