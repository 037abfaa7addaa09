use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use time::OffsetDateTime;
use uuid::Uuid;

use super::node::{Node, NodeUpdate, RootContainer};
use super::provider::{NodeStore, NodeStoreError};

/// In-memory node store using HashMaps
#[derive(Debug, Clone)]
pub struct MemoryNodeStore {
    inner: Arc<RwLock<MemoryNodeStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryNodeStoreInner {
    root: Option<RootContainer>,
    /// node_id -> node
    nodes: HashMap<Uuid, Node>,
    /// parent_id -> child ids
    children: HashMap<Uuid, HashSet<Uuid>>,
    /// root_id -> ids of nodes with no parent
    top_level: HashMap<Uuid, HashSet<Uuid>>,
}

impl MemoryNodeStoreInner {
    fn check_insert(&self, node: &Node) -> Result<(), NodeStoreError<MemoryNodeStoreError>> {
        if self.nodes.contains_key(&node.id) {
            return Err(NodeStoreError::Conflict(node.id));
        }
        if let Some(parent_id) = node.parent_id {
            match self.nodes.get(&parent_id) {
                Some(parent) if parent.is_folder() => {}
                _ => return Err(NodeStoreError::InvalidParent(parent_id)),
            }
        }
        Ok(())
    }

    fn link(&mut self, node: Node) {
        match node.parent_id {
            Some(parent_id) => self.children.entry(parent_id).or_default().insert(node.id),
            None => self.top_level.entry(node.root_id).or_default().insert(node.id),
        };
        self.nodes.insert(node.id, node);
    }

    fn unlink(&mut self, id: Uuid) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        match node.parent_id {
            Some(parent_id) => {
                if let Some(siblings) = self.children.get_mut(&parent_id) {
                    siblings.remove(&id);
                    if siblings.is_empty() && !self.nodes.contains_key(&parent_id) {
                        self.children.remove(&parent_id);
                    }
                }
            }
            None => {
                if let Some(siblings) = self.top_level.get_mut(&node.root_id) {
                    siblings.remove(&id);
                }
            }
        }
        // A removed folder keeps its index entry while children remain,
        //  so a follow-up sweep can still find them
        if self.children.get(&id).is_some_and(HashSet::is_empty) {
            self.children.remove(&id);
        }
        Some(node)
    }

    fn collect(&self, ids: Option<&HashSet<Uuid>>) -> Vec<Node> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| self.nodes.get(id))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryNodeStoreError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryNodeStoreInner::default())),
        }
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, MemoryNodeStoreInner>, NodeStoreError<MemoryNodeStoreError>>
    {
        self.inner.read().map_err(|e| {
            NodeStoreError::Provider(MemoryNodeStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, MemoryNodeStoreInner>, NodeStoreError<MemoryNodeStoreError>>
    {
        self.inner.write().map_err(|e| {
            NodeStoreError::Provider(MemoryNodeStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeStore for MemoryNodeStore {
    type Error = MemoryNodeStoreError;

    async fn root(&self) -> Result<Option<RootContainer>, NodeStoreError<Self::Error>> {
        Ok(self.read()?.root.clone())
    }

    async fn create_root(
        &self,
        root: RootContainer,
    ) -> Result<RootContainer, NodeStoreError<Self::Error>> {
        let mut inner = self.write()?;
        Ok(inner.root.get_or_insert(root).clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Node>, NodeStoreError<Self::Error>> {
        Ok(self.read()?.nodes.get(&id).cloned())
    }

    async fn insert(&self, node: Node) -> Result<Node, NodeStoreError<Self::Error>> {
        let mut inner = self.write()?;
        inner.check_insert(&node)?;
        inner.link(node.clone());
        Ok(node)
    }

    async fn update(
        &self,
        id: Uuid,
        update: NodeUpdate,
    ) -> Result<Node, NodeStoreError<Self::Error>> {
        let mut inner = self.write()?;
        let node = inner
            .nodes
            .get_mut(&id)
            .ok_or(NodeStoreError::NotFound(id))?;
        node.apply(update, OffsetDateTime::now_utc());
        Ok(node.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, NodeStoreError<Self::Error>> {
        Ok(self.write()?.unlink(id).is_some())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, NodeStoreError<Self::Error>> {
        let mut inner = self.write()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.unlink(*id).map(|node| node.id))
            .collect())
    }

    async fn top_level(&self, root_id: Uuid) -> Result<Vec<Node>, NodeStoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner.collect(inner.top_level.get(&root_id)))
    }

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Node>, NodeStoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner.collect(inner.children.get(&parent_id)))
    }

    async fn search(
        &self,
        root_id: Uuid,
        query: &str,
    ) -> Result<Vec<Node>, NodeStoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner
            .nodes
            .values()
            .filter(|node| node.root_id == root_id && node.name.contains(query))
            .cloned()
            .collect())
    }

    async fn seed_top_level(
        &self,
        root_id: Uuid,
        nodes: Vec<Node>,
    ) -> Result<bool, NodeStoreError<Self::Error>> {
        if nodes.is_empty() {
            return Ok(false);
        }
        let mut inner = self.write()?;
        let occupied = inner
            .top_level
            .get(&root_id)
            .map(|ids| !ids.is_empty())
            .unwrap_or(false);
        if occupied {
            return Ok(false);
        }

        // Validate the whole batch before touching the maps so a bad
        //  seed leaves nothing behind. With an empty top level the
        //  tree is empty, so parents can only come from the batch.
        let mut staged = MemoryNodeStoreInner::default();
        for node in &nodes {
            if inner.nodes.contains_key(&node.id) {
                return Err(NodeStoreError::Conflict(node.id));
            }
            staged.check_insert(node)?;
            staged.link(node.clone());
        }

        for node in nodes {
            inner.link(node);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[tokio::test]
    async fn test_insert_requires_live_folder_parent() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();

        let file = store
            .insert(Node::text_file(root.id, None, "a.txt", "a"))
            .await
            .unwrap();

        // Parent is a file
        let result = store
            .insert(Node::folder(root.id, Some(file.id), "nested"))
            .await;
        assert!(matches!(result, Err(NodeStoreError::InvalidParent(id)) if id == file.id));

        // Parent does not exist
        let ghost = Uuid::new_v4();
        let result = store.insert(Node::folder(root.id, Some(ghost), "x")).await;
        assert!(matches!(result, Err(NodeStoreError::InvalidParent(id)) if id == ghost));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();

        let node = Node::folder(root.id, None, "docs");
        store.insert(node.clone()).await.unwrap();
        let result = store.insert(node.clone()).await;
        assert!(matches!(result, Err(NodeStoreError::Conflict(id)) if id == node.id));
    }

    #[tokio::test]
    async fn test_create_root_keeps_first() {
        let store = MemoryNodeStore::new();
        let first = store.create_root(RootContainer::default()).await.unwrap();
        let second = store.create_root(RootContainer::default()).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.root().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_indexes_follow_delete() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();

        let docs = store
            .insert(Node::folder(root.id, None, "docs"))
            .await
            .unwrap();
        let readme = store
            .insert(Node::text_file(root.id, Some(docs.id), "readme", "hello"))
            .await
            .unwrap();

        assert_eq!(store.top_level(root.id).await.unwrap().len(), 1);
        assert_eq!(store.children(docs.id).await.unwrap(), vec![readme.clone()]);

        assert!(store.delete(readme.id).await.unwrap());
        assert!(!store.delete(readme.id).await.unwrap());
        assert!(store.children(docs.id).await.unwrap().is_empty());

        let removed = store.delete_many(&[docs.id, readme.id]).await.unwrap();
        assert_eq!(removed, vec![docs.id]);
        assert!(store.top_level(root.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_node_is_not_found() {
        let store = MemoryNodeStore::new();
        let id = Uuid::new_v4();
        let result = store.update(id, NodeUpdate::Rename("x".into())).await;
        assert!(matches!(result, Err(NodeStoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_seed_only_into_empty_top_level() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();

        let folder = Node::folder(root.id, None, "files");
        let inside = Node::text_file(root.id, Some(folder.id), "inside.txt", "x");
        assert!(store
            .seed_top_level(root.id, vec![folder.clone(), inside])
            .await
            .unwrap());
        assert!(!store
            .seed_top_level(root.id, vec![Node::folder(root.id, None, "files")])
            .await
            .unwrap());

        let top = store.top_level(root.id).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].kind, NodeKind::Folder);
        assert_eq!(store.children(folder.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();
        store
            .insert(Node::folder(root.id, None, "Reports"))
            .await
            .unwrap();
        store
            .insert(Node::folder(root.id, None, "reports-old"))
            .await
            .unwrap();

        let hits = store.search(root.id, "report").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "reports-old");
    }
}
