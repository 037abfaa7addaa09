use clap::Args;

use filetree_daemon::http_server::api::files::RootRequest;

use super::{render_items, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Root;

#[async_trait::async_trait]
impl crate::cli::op::Op for Root {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(RootRequest).await?;
        Ok(format!(
            "root: {}\n{}",
            response.root_id,
            render_items(&response.root_files)
        ))
    }
}
