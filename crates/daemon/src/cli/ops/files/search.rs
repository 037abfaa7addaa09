use clap::Args;

use filetree_daemon::http_server::api::files::SearchRequest;

use super::{render_items, FilesOpError};

#[derive(Args, Debug, Clone)]
pub struct Search {
    #[command(flatten)]
    pub request: SearchRequest,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Search {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let items = client.call(self.request.clone()).await?;
        Ok(render_items(&items))
    }
}
