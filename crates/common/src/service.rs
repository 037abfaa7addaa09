use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::ContentStore;
use crate::node::{Content, Node, NodeKind, NodeStore, RootContainer};
use crate::tree::{
    subtree_stats, Bootstrapper, DeleteSummary, ErrorKind, SeedConfig, SubtreeStats, Tree,
    TreeError,
};

#[derive(Debug, thiserror::Error)]
pub enum FileServiceError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("content store error: {0}")]
    Content(String),
}

impl FileServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FileServiceError::Tree(e) => e.kind(),
            FileServiceError::Content(_) => ErrorKind::StorageUnavailable,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            FileServiceError::Tree(e) => e.public_message(),
            FileServiceError::Content(_) => "storage unavailable".to_string(),
        }
    }
}

impl<E: std::error::Error> From<crate::node::NodeStoreError<E>> for FileServiceError {
    fn from(err: crate::node::NodeStoreError<E>) -> Self {
        FileServiceError::Tree(err.into())
    }
}

/// The root container id together with everything directly under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootListing {
    pub root_id: Uuid,
    pub nodes: Vec<Node>,
}

/// Raw content of a file as served back to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectContent {
    Text(String),
    Bytes { name: String, data: Bytes },
    Empty,
}

/// Query and mutation facade over a node store and a content store.
///
/// Cheap to clone; clones share the same bootstrap state.
#[derive(Debug, Clone)]
pub struct FileService<S, C> {
    tree: Tree<S>,
    bootstrap: Arc<Bootstrapper<S>>,
    content: C,
}

impl<S: NodeStore, C: ContentStore> FileService<S, C> {
    pub fn new(store: S, content: C, seed: SeedConfig) -> Self {
        Self {
            tree: Tree::new(store.clone()),
            bootstrap: Arc::new(Bootstrapper::new(store, seed)),
            content,
        }
    }

    pub fn store(&self) -> &S {
        self.tree.store()
    }

    pub fn content_store(&self) -> &C {
        &self.content
    }

    pub async fn root(&self) -> Result<RootContainer, FileServiceError> {
        Ok(self.bootstrap.root().await?)
    }

    /// Top-level listing. Bootstraps the root on first use and seeds
    ///  whenever the top level is read back empty.
    #[tracing::instrument(skip(self))]
    pub async fn list_root(&self) -> Result<RootListing, FileServiceError> {
        let root = self.root().await?;
        let mut nodes = self.store().top_level(root.id).await?;
        if nodes.is_empty() {
            // Lost races still re-read so the winner's seed is returned
            self.bootstrap.seed(&root).await?;
            nodes = self.store().top_level(root.id).await?;
        }
        Ok(RootListing {
            root_id: root.id,
            nodes,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_children(&self, id: Uuid) -> Result<Vec<Node>, FileServiceError> {
        let root = self.root().await?;
        if id == root.id {
            return Ok(self.store().top_level(root.id).await?);
        }
        let node = self.tree.get(id).await?;
        if !node.is_folder() {
            return Err(TreeError::NotFound(id).into());
        }
        Ok(self.store().children(id).await?)
    }

    pub async fn get_node(&self, id: Uuid) -> Result<Node, FileServiceError> {
        Ok(self.tree.get(id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_info(&self, id: Uuid) -> Result<SubtreeStats, FileServiceError> {
        let root = self.root().await?;
        Ok(subtree_stats(self.store(), &root, id).await?)
    }

    pub async fn create(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
        kind: NodeKind,
    ) -> Result<Node, FileServiceError> {
        let root = self.root().await?;
        Ok(self.tree.create(&root, parent_id, name, kind).await?)
    }

    pub async fn create_file(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
        text: Option<String>,
    ) -> Result<Node, FileServiceError> {
        let root = self.root().await?;
        Ok(self.tree.create_file(&root, parent_id, name, text).await?)
    }

    /// Register bytes that already live in the content store
    pub async fn upload_file(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
        size: u64,
        content_ref: String,
    ) -> Result<Node, FileServiceError> {
        let root = self.root().await?;
        Ok(self
            .tree
            .attach_upload(&root, parent_id, name, size, content_ref)
            .await?)
    }

    #[tracing::instrument(skip(self, data), fields(len = data.len()))]
    pub async fn upload_bytes(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
        data: Bytes,
    ) -> Result<Node, FileServiceError> {
        if name.trim().is_empty() {
            return Err(TreeError::Validation("name cannot be empty".to_string()).into());
        }
        let root = self.root().await?;
        self.tree.check_parent(&root, parent_id).await?;

        let size = data.len() as u64;
        let reference = self.put_content(name, data).await?;
        match self
            .tree
            .attach_upload(&root, parent_id, name, size, reference.clone())
            .await
        {
            Ok(node) => Ok(node),
            Err(e) => {
                // The parent went away after the check
                self.discard_content(&reference).await;
                Err(e.into())
            }
        }
    }

    pub async fn replace_text(&self, id: Uuid, text: String) -> Result<Node, FileServiceError> {
        Ok(self.tree.replace_text(id, text).await?)
    }

    #[tracing::instrument(skip(self, data), fields(len = data.len()))]
    pub async fn replace_upload(&self, id: Uuid, data: Bytes) -> Result<Node, FileServiceError> {
        let node = self.tree.get(id).await?;
        if node.is_folder() {
            return Err(TreeError::Validation("folders do not carry content".to_string()).into());
        }
        let size = data.len() as u64;
        let reference = self.put_content(&node.name, data).await?;
        match self.tree.replace_reference(id, size, reference.clone()).await {
            Ok(updated) => {
                if let Some(previous) = node.content_ref() {
                    self.discard_content(previous).await;
                }
                Ok(updated)
            }
            Err(e) => {
                self.discard_content(&reference).await;
                Err(e.into())
            }
        }
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Node, FileServiceError> {
        Ok(self.tree.rename(id, name).await?)
    }

    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete(&self, ids: &[Uuid]) -> Result<DeleteSummary, FileServiceError> {
        let root = self.root().await?;
        Ok(self.tree.delete(&root, ids).await?)
    }

    /// Case-sensitive substring match on names across the whole tree
    pub async fn search(&self, query: &str) -> Result<Vec<Node>, FileServiceError> {
        let root = self.root().await?;
        Ok(self.store().search(root.id, query).await?)
    }

    pub async fn read_content(&self, id: Uuid) -> Result<DirectContent, FileServiceError> {
        let node = self.tree.get(id).await?;
        if node.is_folder() {
            return Err(TreeError::Validation("folders do not carry content".to_string()).into());
        }
        match node.content {
            None => Ok(DirectContent::Empty),
            Some(Content::Text(text)) => Ok(DirectContent::Text(text)),
            Some(Content::Reference(reference)) => {
                let data = self.content.get(&reference).await.map_err(|e| {
                    tracing::error!(error = %e, %reference, "content store read failed");
                    FileServiceError::Content(e.to_string())
                })?;
                match data {
                    Some(data) => Ok(DirectContent::Bytes {
                        name: node.name,
                        data,
                    }),
                    None => {
                        tracing::warn!(%id, %reference, "content reference points at nothing");
                        Ok(DirectContent::Empty)
                    }
                }
            }
        }
    }

    async fn put_content(&self, name: &str, data: Bytes) -> Result<String, FileServiceError> {
        self.content.put(name, data).await.map_err(|e| {
            tracing::error!(error = %e, name, "content store write failed");
            FileServiceError::Content(e.to_string())
        })
    }

    /// Best effort; a leftover object is unreachable, not corrupt
    async fn discard_content(&self, reference: &str) {
        if let Err(e) = self.content.delete(reference).await {
            tracing::warn!(error = %e, %reference, "failed to discard content");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryContentStore;
    use crate::node::MemoryNodeStore;
    use crate::tree::SEED_FOLDER_NAME;

    fn service() -> FileService<MemoryNodeStore, MemoryContentStore> {
        FileService::new(
            MemoryNodeStore::new(),
            MemoryContentStore::new(),
            SeedConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_list_root_seeds_once() {
        let service = service();
        let first = service.list_root().await.unwrap();
        assert_eq!(first.nodes.len(), 1);
        assert_eq!(first.nodes[0].name, SEED_FOLDER_NAME);

        let second = service.list_root().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_children_of_file_is_not_found() {
        let service = service();
        let file = service.create_file(None, "a.txt", None).await.unwrap();
        let result = service.list_children(file.id).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_children_of_root_is_top_level() {
        let service = service();
        let listing = service.list_root().await.unwrap();
        let children = service.list_children(listing.root_id).await.unwrap();
        assert_eq!(children, listing.nodes);
    }

    #[tokio::test]
    async fn test_upload_then_read_bytes() {
        let service = service();
        let data = Bytes::from_static(b"\x89PNG\r\n");
        let node = service
            .upload_bytes(None, "logo.png", data.clone())
            .await
            .unwrap();
        assert_eq!(node.size, 6);
        assert!(node.content_ref().is_some());

        let content = service.read_content(node.id).await.unwrap();
        assert_eq!(
            content,
            DirectContent::Bytes {
                name: "logo.png".into(),
                data
            }
        );
    }

    #[tokio::test]
    async fn test_replace_upload_swaps_reference() {
        let service = service();
        let node = service
            .create_file(None, "notes.txt", Some("hi".into()))
            .await
            .unwrap();
        let updated = service
            .replace_upload(node.id, Bytes::from_static(b"longer body"))
            .await
            .unwrap();
        assert_eq!(updated.size, 11);
        assert_eq!(updated.text(), None);
        assert!(updated.updated_at > node.updated_at);
    }

    #[tokio::test]
    async fn test_read_content_variants() {
        let service = service();
        let empty = service.create_file(None, "empty", None).await.unwrap();
        let text = service
            .create_file(None, "notes.txt", Some("hi".into()))
            .await
            .unwrap();
        let folder = service
            .create(None, "docs", NodeKind::Folder)
            .await
            .unwrap();

        assert_eq!(
            service.read_content(empty.id).await.unwrap(),
            DirectContent::Empty
        );
        assert_eq!(
            service.read_content(text.id).await.unwrap(),
            DirectContent::Text("hi".into())
        );
        assert_eq!(
            service.read_content(folder.id).await.unwrap_err().kind(),
            ErrorKind::ValidationError
        );
    }

    #[tokio::test]
    async fn test_upload_with_blank_name_stores_nothing() {
        let service = service();
        let result = service
            .upload_bytes(None, " ", Bytes::from_static(b"x"))
            .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ValidationError);
        assert!(service.content_store().is_empty());
    }

    #[tokio::test]
    async fn test_upload_under_bad_parent_stores_nothing() {
        let service = service();
        let file = service.create_file(None, "a.txt", None).await.unwrap();

        for parent in [Uuid::new_v4(), file.id] {
            let result = service
                .upload_bytes(Some(parent), "a.bin", Bytes::from_static(b"abc"))
                .await;
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidParent);
        }
        assert!(service.content_store().is_empty());
    }

    #[tokio::test]
    async fn test_replace_upload_discards_previous_bytes() {
        let service = service();
        let node = service
            .upload_bytes(None, "a.bin", Bytes::from_static(b"one"))
            .await
            .unwrap();
        let first = node.content_ref().unwrap().to_string();

        let updated = service
            .replace_upload(node.id, Bytes::from_static(b"two"))
            .await
            .unwrap();
        assert_eq!(service.content_store().len(), 1);
        assert_eq!(service.content_store().get(&first).await.unwrap(), None);
        assert_eq!(
            service.read_content(updated.id).await.unwrap(),
            DirectContent::Bytes {
                name: "a.bin".into(),
                data: Bytes::from_static(b"two")
            }
        );
    }
}
