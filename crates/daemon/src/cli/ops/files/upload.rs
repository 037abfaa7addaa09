use std::path::PathBuf;

use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::{UploadRequest, UploadTarget};

use super::{parent_or_root, render_node, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Local file to send
    pub path: PathBuf,

    /// Parent folder (defaults to the top level)
    #[arg(long, conflicts_with = "replace")]
    pub parent: Option<Uuid>,

    /// Name to store under (defaults to the local file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the bytes of this existing file instead of creating one
    #[arg(long)]
    pub replace: Option<Uuid>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();

        let name = match &self.name {
            Some(name) => name.clone(),
            None => self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    FilesOpError::InvalidInput(format!("{} has no file name", self.path.display()))
                })?,
        };
        let data = tokio::fs::read(&self.path).await?;

        let target = match self.replace {
            Some(id) => UploadTarget::Replace(id),
            None => UploadTarget::Create(parent_or_root(&mut client, self.parent).await?),
        };

        let node = client.call(UploadRequest { target, name, data }).await?;
        Ok(render_node(&node))
    }
}
