use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use super::node::{Node, NodeUpdate, RootContainer};

#[derive(thiserror::Error, Debug)]
pub enum NodeStoreError<T> {
    /// The backing store failed (i/o, lock, decode)
    #[error("unhandled node store provider error: {0}")]
    Provider(#[from] T),
    /// The id does not resolve to a live node
    #[error("node not found: {0}")]
    NotFound(Uuid),
    /// An insert named a parent that is missing or not a folder
    ///  at the instant of insertion
    #[error("parent is not a live folder: {0}")]
    InvalidParent(Uuid),
    /// An insert reused an id that already exists, or an update
    ///  lost every retry against concurrent writers
    #[error("conflicting write for node: {0}")]
    Conflict(Uuid),
}

/// Durable storage for tree nodes.
///
/// Implementations own two guarantees the tree engine builds on:
/// * `insert` checks the parent and writes the row as one atomic step, so
///   a node can never be attached to a folder that is already gone.
/// * `update` only ever touches an existing row; it fails with
///   `NotFound` instead of recreating a deleted node.
#[async_trait]
pub trait NodeStore: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The root container, if the store has been initialized
    async fn root(&self) -> Result<Option<RootContainer>, NodeStoreError<Self::Error>>;

    /// Create the root container if none exists.
    ///
    /// Returns whichever root container survives: `root` if this call
    ///  created it, otherwise the one that already existed. Must never
    ///  leave two root containers behind.
    async fn create_root(
        &self,
        root: RootContainer,
    ) -> Result<RootContainer, NodeStoreError<Self::Error>>;

    async fn get(&self, id: Uuid) -> Result<Option<Node>, NodeStoreError<Self::Error>>;

    /// Persist a new node
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(NodeStoreError::Conflict)` - the id is already taken
    /// * `Err(NodeStoreError::InvalidParent)` - `parent_id` is set and does not
    ///   name a live folder
    async fn insert(&self, node: Node) -> Result<Node, NodeStoreError<Self::Error>>;

    /// Apply a rename or content mutation in place and return the new record
    async fn update(
        &self,
        id: Uuid,
        update: NodeUpdate,
    ) -> Result<Node, NodeStoreError<Self::Error>>;

    /// Remove exactly one node. Returns whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, NodeStoreError<Self::Error>>;

    /// Remove a set of nodes in one sweep, returning the ids that existed.
    ///
    /// Providers with transactions should override this so the sweep is
    ///  all-or-nothing.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, NodeStoreError<Self::Error>> {
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if self.delete(*id).await? {
                removed.push(*id);
            }
        }
        Ok(removed)
    }

    /// Nodes directly under the root container
    async fn top_level(&self, root_id: Uuid) -> Result<Vec<Node>, NodeStoreError<Self::Error>>;

    /// Immediate children of a node
    async fn children(&self, parent_id: Uuid) -> Result<Vec<Node>, NodeStoreError<Self::Error>>;

    /// Every node under `root_id` whose name contains `query` (case-sensitive)
    async fn search(
        &self,
        root_id: Uuid,
        query: &str,
    ) -> Result<Vec<Node>, NodeStoreError<Self::Error>>;

    /// Insert `nodes` only if the top level of `root_id` is empty at this
    ///  instant. Returns whether anything was written.
    ///
    /// `nodes` may reference each other as parents as long as parents come
    ///  first.
    async fn seed_top_level(
        &self,
        root_id: Uuid,
        nodes: Vec<Node>,
    ) -> Result<bool, NodeStoreError<Self::Error>>;
}
