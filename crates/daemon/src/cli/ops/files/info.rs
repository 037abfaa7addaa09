use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::InfoRequest;

use super::FilesOpError;

#[derive(Args, Debug, Clone)]
pub struct Info {
    /// Folder, file or root id
    pub id: Uuid,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Info {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let stats = client.call(InfoRequest { id: self.id }).await?;
        Ok(format!("count: {}\nsize:  {} bytes", stats.count, stats.size))
    }
}
