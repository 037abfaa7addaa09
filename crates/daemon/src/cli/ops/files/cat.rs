use clap::Args;
use uuid::Uuid;

use filetree_daemon::http_server::api::files::DirectRequest;

use super::FilesOpError;

#[derive(Args, Debug, Clone)]
pub struct Cat {
    /// File to print
    pub id: Uuid,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Cat {
    type Error = FilesOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let request = DirectRequest {
            id: self.id.to_string(),
        };
        let (content_type, body) = client.call_raw(request).await?;

        let is_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"));
        if is_json && body.as_ref() == b"\"empty\"" {
            return Ok("(empty)".to_string());
        }

        match String::from_utf8(body.to_vec()) {
            Ok(text) => Ok(text),
            Err(_) => Ok(format!(
                "Binary content: {} bytes ({})",
                body.len(),
                content_type.as_deref().unwrap_or("unknown type")
            )),
        }
    }
}
