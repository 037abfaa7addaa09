use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::{Content, Node, NodeKind, NodeStore, NodeUpdate, RootContainer};

use super::error::TreeError;
use super::walk::SubtreeWalk;

/// Outcome of a batch delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    /// Distinct ids in the request
    pub requested: usize,
    /// Requested ids that were actually removed
    pub deleted: usize,
    /// Nodes removed only because an ancestor was
    pub descendants_deleted: usize,
}

/// Integrity rules on top of a node store.
///
/// Every mutation of the tree goes through here. Parent checks are left
///  to the store's atomic insert, so a parent that disappears between
///  validation and write still fails the create.
#[derive(Debug, Clone)]
pub struct Tree<S> {
    store: S,
}

fn validate_name(name: &str) -> Result<(), TreeError> {
    if name.trim().is_empty() {
        return Err(TreeError::Validation("name cannot be empty".to_string()));
    }
    Ok(())
}

/// The root container id stands for "top level"
fn resolve_parent(root: &RootContainer, parent_id: Option<Uuid>) -> Option<Uuid> {
    parent_id.filter(|id| *id != root.id)
}

impl<S: NodeStore> Tree<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get(&self, id: Uuid) -> Result<Node, TreeError> {
        self.store.get(id).await?.ok_or(TreeError::NotFound(id))
    }

    /// Fail with `InvalidParent` unless `parent_id` names the top level or
    ///  a live folder. The store still re-checks on insert.
    pub async fn check_parent(
        &self,
        root: &RootContainer,
        parent_id: Option<Uuid>,
    ) -> Result<(), TreeError> {
        let Some(parent_id) = resolve_parent(root, parent_id) else {
            return Ok(());
        };
        match self.store.get(parent_id).await? {
            Some(parent) if parent.is_folder() => Ok(()),
            _ => Err(TreeError::InvalidParent(parent_id)),
        }
    }

    /// Create an empty file or folder
    pub async fn create(
        &self,
        root: &RootContainer,
        parent_id: Option<Uuid>,
        name: &str,
        kind: NodeKind,
    ) -> Result<Node, TreeError> {
        let parent_id = resolve_parent(root, parent_id);
        let node = match kind {
            NodeKind::Folder => Node::folder(root.id, parent_id, name),
            NodeKind::File => Node::file(root.id, parent_id, name, 0, None),
        };
        self.insert(node).await
    }

    /// Create a file, optionally with inline text
    pub async fn create_file(
        &self,
        root: &RootContainer,
        parent_id: Option<Uuid>,
        name: &str,
        text: Option<String>,
    ) -> Result<Node, TreeError> {
        let parent_id = resolve_parent(root, parent_id);
        let node = match text {
            Some(text) => Node::text_file(root.id, parent_id, name, text),
            None => Node::file(root.id, parent_id, name, 0, None),
        };
        self.insert(node).await
    }

    /// Create a file whose bytes already sit in a content store
    pub async fn attach_upload(
        &self,
        root: &RootContainer,
        parent_id: Option<Uuid>,
        name: &str,
        size: u64,
        content_ref: String,
    ) -> Result<Node, TreeError> {
        if content_ref.is_empty() {
            return Err(TreeError::Validation(
                "content reference cannot be empty".to_string(),
            ));
        }
        let parent_id = resolve_parent(root, parent_id);
        let node = Node::file(
            root.id,
            parent_id,
            name,
            size,
            Some(Content::Reference(content_ref)),
        );
        self.insert(node).await
    }

    async fn insert(&self, node: Node) -> Result<Node, TreeError> {
        validate_name(&node.name)?;
        let node = self.store.insert(node).await?;
        tracing::debug!(
            id = %node.id,
            parent_id = ?node.parent_id,
            kind = %node.kind,
            "created node"
        );
        Ok(node)
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Node, TreeError> {
        validate_name(name)?;
        let node = self
            .store
            .update(id, NodeUpdate::Rename(name.to_string()))
            .await?;
        tracing::debug!(%id, name, "renamed node");
        Ok(node)
    }

    /// Replace a file's content with inline text
    pub async fn replace_text(&self, id: Uuid, text: String) -> Result<Node, TreeError> {
        let size = text.len() as u64;
        self.replace_content(id, size, Content::Text(text)).await
    }

    /// Point a file at freshly stored bytes
    pub async fn replace_reference(
        &self,
        id: Uuid,
        size: u64,
        content_ref: String,
    ) -> Result<Node, TreeError> {
        if content_ref.is_empty() {
            return Err(TreeError::Validation(
                "content reference cannot be empty".to_string(),
            ));
        }
        self.replace_content(id, size, Content::Reference(content_ref))
            .await
    }

    async fn replace_content(
        &self,
        id: Uuid,
        size: u64,
        content: Content,
    ) -> Result<Node, TreeError> {
        let node = self.get(id).await?;
        if node.is_folder() {
            return Err(TreeError::Validation(
                "folders do not carry content".to_string(),
            ));
        }
        // A delete landing between the check and here surfaces as NotFound
        let node = self
            .store
            .update(
                id,
                NodeUpdate::Content {
                    size,
                    content: Some(content),
                },
            )
            .await?;
        tracing::debug!(%id, size, "replaced file content");
        Ok(node)
    }

    /// Delete a batch of nodes, cascading through folders.
    ///
    /// Unknown ids and the root container id are skipped, never errors.
    ///  Children inserted under a doomed folder while the sweep runs are
    ///  picked up by re-listing removed folders until nothing is left.
    pub async fn delete(
        &self,
        root: &RootContainer,
        ids: &[Uuid],
    ) -> Result<DeleteSummary, TreeError> {
        let requested: BTreeSet<Uuid> = ids.iter().copied().collect();

        let mut frontier = Vec::new();
        for id in &requested {
            if *id == root.id {
                tracing::debug!(%id, "ignoring delete of root container");
                continue;
            }
            if let Some(node) = self.store.get(*id).await? {
                frontier.push(node);
            }
        }

        let mut removed: HashSet<Uuid> = HashSet::new();
        while !frontier.is_empty() {
            let doomed = SubtreeWalk::new(frontier).collect(&self.store).await?;
            let folders: Vec<Uuid> = doomed
                .iter()
                .filter(|node| node.is_folder())
                .map(|node| node.id)
                .collect();
            let sweep: Vec<Uuid> = doomed
                .iter()
                .map(|node| node.id)
                .filter(|id| !removed.contains(id))
                .collect();

            removed.extend(self.store.delete_many(&sweep).await?);

            frontier = Vec::new();
            for folder in folders {
                frontier.extend(self.store.children(folder).await?);
            }
            if !frontier.is_empty() {
                tracing::warn!(
                    stragglers = frontier.len(),
                    "children appeared under deleted folders, sweeping again"
                );
            }
        }

        let deleted = requested.iter().filter(|id| removed.contains(id)).count();
        let summary = DeleteSummary {
            requested: requested.len(),
            deleted,
            descendants_deleted: removed.len() - deleted,
        };
        tracing::info!(
            requested = summary.requested,
            deleted = summary.deleted,
            descendants = summary.descendants_deleted,
            "deleted nodes"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MemoryNodeStore;

    async fn setup() -> (Tree<MemoryNodeStore>, RootContainer) {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();
        (Tree::new(store), root)
    }

    #[tokio::test]
    async fn test_root_id_as_parent_means_top_level() {
        let (tree, root) = setup().await;
        let node = tree
            .create(&root, Some(root.id), "docs", NodeKind::Folder)
            .await
            .unwrap();
        assert!(node.is_top_level());
        assert_eq!(node.size, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_names() {
        let (tree, root) = setup().await;
        for name in ["", "   ", "\t\n"] {
            let result = tree.create(&root, None, name, NodeKind::Folder).await;
            assert!(matches!(result, Err(TreeError::Validation(_))));
        }
        assert!(tree.store().top_level(root.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_under_file_is_invalid_parent() {
        let (tree, root) = setup().await;
        let file = tree
            .create_file(&root, None, "a.txt", Some("a".into()))
            .await
            .unwrap();
        let result = tree
            .create(&root, Some(file.id), "x", NodeKind::File)
            .await;
        assert!(matches!(result, Err(TreeError::InvalidParent(id)) if id == file.id));
    }

    #[tokio::test]
    async fn test_rename_keeps_identity() {
        let (tree, root) = setup().await;
        let node = tree
            .create(&root, None, "draft", NodeKind::File)
            .await
            .unwrap();
        let renamed = tree.rename(node.id, "final").await.unwrap();
        assert_eq!(renamed.id, node.id);
        assert_eq!(renamed.name, "final");
        assert!(renamed.updated_at > node.updated_at);

        assert!(matches!(
            tree.rename(node.id, " ").await,
            Err(TreeError::Validation(_))
        ));
        let ghost = Uuid::new_v4();
        assert!(matches!(
            tree.rename(ghost, "x").await,
            Err(TreeError::NotFound(id)) if id == ghost
        ));
    }

    #[tokio::test]
    async fn test_content_replacement_rules() {
        let (tree, root) = setup().await;
        let folder = tree
            .create(&root, None, "docs", NodeKind::Folder)
            .await
            .unwrap();
        let file = tree.create_file(&root, None, "a.txt", None).await.unwrap();
        assert_eq!(file.size, 0);

        let updated = tree.replace_text(file.id, "hello".into()).await.unwrap();
        assert_eq!(updated.size, 5);
        assert_eq!(updated.text(), Some("hello"));

        let updated = tree
            .replace_reference(file.id, 1024, "files/abc_a.txt".into())
            .await
            .unwrap();
        assert_eq!(updated.size, 1024);
        assert_eq!(updated.content_ref(), Some("files/abc_a.txt"));
        assert_eq!(updated.text(), None);

        assert!(matches!(
            tree.replace_text(folder.id, "x".into()).await,
            Err(TreeError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_counts_requested_and_descendants() {
        let (tree, root) = setup().await;
        let docs = tree
            .create(&root, None, "docs", NodeKind::Folder)
            .await
            .unwrap();
        let inner = tree
            .create(&root, Some(docs.id), "inner", NodeKind::Folder)
            .await
            .unwrap();
        tree.create_file(&root, Some(inner.id), "a.txt", Some("a".into()))
            .await
            .unwrap();
        let keep = tree.create_file(&root, None, "keep.txt", None).await.unwrap();

        let ghost = Uuid::new_v4();
        let summary = tree
            .delete(&root, &[docs.id, docs.id, ghost, root.id])
            .await
            .unwrap();
        assert_eq!(
            summary,
            DeleteSummary {
                requested: 3,
                deleted: 1,
                descendants_deleted: 2
            }
        );

        let top = tree.store().top_level(root.id).await.unwrap();
        assert_eq!(top, vec![keep]);
        assert!(tree.store().get(inner.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_parent_and_child_together() {
        let (tree, root) = setup().await;
        let docs = tree
            .create(&root, None, "docs", NodeKind::Folder)
            .await
            .unwrap();
        let file = tree
            .create_file(&root, Some(docs.id), "a.txt", None)
            .await
            .unwrap();

        let summary = tree.delete(&root, &[file.id, docs.id]).await.unwrap();
        assert_eq!(summary.requested, 2);
        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.descendants_deleted, 0);
    }
}
