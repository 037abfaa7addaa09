use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::{UpdateOperation, UpdateRequest};

use super::{render_node, FilesOpError};

/// Replace a file's content with inline text
#[derive(Args, Debug, Clone)]
pub struct Write {
    pub id: Uuid,
    pub text: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Write {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let request = UpdateRequest {
            id: self.id,
            operation: UpdateOperation::Text {
                text: self.text.clone(),
            },
        };
        let node = client.call(request).await?;
        Ok(render_node(&node))
    }
}
