use clap::{Args, Subcommand};
use uuid::Uuid;

use common::prelude::Node;
use filetree_daemon::http_server::api::client::{ApiClient, ApiError};
use filetree_daemon::http_server::api::files::{FileItem, RootRequest};

pub mod cat;
pub mod get;
pub mod info;
pub mod ls;
pub mod mkdir;
pub mod rename;
pub mod rm;
pub mod root;
pub mod search;
pub mod touch;
pub mod upload;
pub mod write;

use crate::cli::op::Op;

crate::command_enum! {
    (Root, root::Root),
    (Ls, ls::Ls),
    (Get, get::Get),
    (Info, info::Info),
    (Mkdir, mkdir::Mkdir),
    (Touch, touch::Touch),
    (Write, write::Write),
    (Upload, upload::Upload),
    (Rename, rename::Rename),
    (Rm, rm::Rm),
    (Search, search::Search),
    (Cat, cat::Cat),
}

// Rename the generated Command to FilesCommand for clarity
pub type FilesCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Files {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[async_trait::async_trait]
impl Op for Files {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilesOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Parent for a new node: the given folder, or the root container
pub(crate) async fn parent_or_root(
    client: &mut ApiClient,
    parent: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    match parent {
        Some(id) => Ok(id),
        None => Ok(client.call(RootRequest).await?.root_id),
    }
}

pub(crate) fn render_items(items: &[FileItem]) -> String {
    if items.is_empty() {
        return "No items found".to_string();
    }
    items
        .iter()
        .map(|item| match item.size {
            Some(size) => format!(
                "{}  {:<6} {} ({} bytes)",
                item.id,
                item.kind.as_str(),
                item.name,
                size
            ),
            None => format!("{}  {:<6} {}/", item.id, item.kind.as_str(), item.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn render_node(node: &Node) -> String {
    let parent = node
        .parent_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("id:       {}", node.id),
        format!("name:     {}", node.name),
        format!("type:     {}", node.kind),
        format!("parent:   {}", parent),
        format!("created:  {}", node.created_at),
        format!("updated:  {}", node.updated_at),
    ];
    if node.is_file() {
        lines.push(format!("size:     {}", node.size));
    }
    lines.join("\n")
}
