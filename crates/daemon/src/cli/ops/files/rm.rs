use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::DeleteRequest;

use super::FilesOpError;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Nodes to delete; folders take their whole subtree with them
    #[arg(required = true)]
    pub ids: Vec<Uuid>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rm {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(DeleteRequest::new(&self.ids)).await?;
        Ok(format!(
            "deleted {} of {} requested ({} descendants)",
            response.deleted_count, response.total_requested, response.descendants_deleted
        ))
    }
}
