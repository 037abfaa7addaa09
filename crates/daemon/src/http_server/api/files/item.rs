use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use common::prelude::{Node, NodeKind};

/// Flattened listing entry. Folders carry no size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: Uuid,
    pub name: String,
    /// Last modification time
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl From<Node> for FileItem {
    fn from(node: Node) -> Self {
        let size = node.is_file().then_some(node.size);
        Self {
            id: node.id,
            name: node.name,
            date: node.updated_at,
            kind: node.kind,
            size,
        }
    }
}

pub fn items(nodes: Vec<Node>) -> Vec<FileItem> {
    nodes.into_iter().map(FileItem::from).collect()
}
