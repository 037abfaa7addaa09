use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

pub const DEFAULT_ROOT_NAME: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("unknown node kind: {0}")]
pub struct NodeKindError(pub String);

impl FromStr for NodeKind {
    type Err = NodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(NodeKind::File),
            "folder" => Ok(NodeKind::Folder),
            other => Err(NodeKindError(other.to_string())),
        }
    }
}

/// Where a file's bytes live. A node holds at most one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Content {
    /// Reference into an external content store
    Reference(String),
    /// Small text files are kept inline
    Text(String),
}

impl Content {
    pub fn reference(&self) -> Option<&str> {
        match self {
            Content::Reference(reference) => Some(reference),
            Content::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Reference(_) => None,
            Content::Text(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootContainer {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl RootContainer {
    pub fn new(name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for RootContainer {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: Uuid,
    pub root_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Node {
    /// A fresh folder record. Folders are always size 0.
    pub fn folder(root_id: Uuid, parent_id: Option<Uuid>, name: impl Into<String>) -> Self {
        Self::fresh(root_id, parent_id, name.into(), NodeKind::Folder, 0, None)
    }

    /// A fresh file record
    pub fn file(
        root_id: Uuid,
        parent_id: Option<Uuid>,
        name: impl Into<String>,
        size: u64,
        content: Option<Content>,
    ) -> Self {
        Self::fresh(root_id, parent_id, name.into(), NodeKind::File, size, content)
    }

    /// A file whose bytes are kept inline; size is the UTF-8 length
    pub fn text_file(
        root_id: Uuid,
        parent_id: Option<Uuid>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let size = text.len() as u64;
        Self::file(root_id, parent_id, name, size, Some(Content::Text(text)))
    }

    fn fresh(
        root_id: Uuid,
        parent_id: Option<Uuid>,
        name: String,
        kind: NodeKind,
        size: u64,
        content: Option<Content>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            root_id,
            parent_id,
            name,
            kind,
            size,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(Content::text)
    }

    pub fn content_ref(&self) -> Option<&str> {
        self.content.as_ref().and_then(Content::reference)
    }

    /// Apply an in-place mutation and advance `updated_at`.
    ///
    /// `updated_at` strictly increases even if the clock hasn't moved
    ///  since the last write.
    pub fn apply(&mut self, update: NodeUpdate, now: OffsetDateTime) {
        match update {
            NodeUpdate::Rename(name) => self.name = name,
            NodeUpdate::Content { size, content } => {
                self.size = size;
                self.content = content;
            }
        }
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// The only mutations a live node accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeUpdate {
    Rename(String),
    Content {
        size: u64,
        content: Option<Content>,
    },
}
