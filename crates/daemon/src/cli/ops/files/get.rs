use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::GetRequest;

use super::{render_node, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Get {
    /// Node to show
    pub id: Uuid,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Get {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let node = client.call(GetRequest { id: self.id }).await?;
        Ok(render_node(&node))
    }
}
