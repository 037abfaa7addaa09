use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::{ListChildrenRequest, ListRootRequest};

use super::{render_items, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Folder to list (defaults to the top level)
    pub id: Option<Uuid>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Ls {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let items = match self.id {
            Some(id) => client.call(ListChildrenRequest { id }).await?,
            None => client.call(ListRootRequest).await?,
        };
        Ok(render_items(&items))
    }
}
