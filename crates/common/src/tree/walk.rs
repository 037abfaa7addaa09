use std::collections::{HashSet, VecDeque};

use uuid::Uuid;

use crate::node::{Node, NodeStore, NodeStoreError};

/// Breadth-first walk down the parent relation.
///
/// Starts from a frontier of nodes and yields each of them plus every
///  transitive descendant exactly once. The queue lives on the heap, so
///  depth is bounded by memory rather than the call stack.
#[derive(Debug, Default)]
pub struct SubtreeWalk {
    queue: VecDeque<Node>,
    seen: HashSet<Uuid>,
}

impl SubtreeWalk {
    pub fn new(frontier: impl IntoIterator<Item = Node>) -> Self {
        Self {
            queue: frontier.into_iter().collect(),
            seen: HashSet::new(),
        }
    }

    pub async fn next<S: NodeStore>(
        &mut self,
        store: &S,
    ) -> Result<Option<Node>, NodeStoreError<S::Error>> {
        while let Some(node) = self.queue.pop_front() {
            if !self.seen.insert(node.id) {
                continue;
            }
            if node.is_folder() {
                self.queue.extend(store.children(node.id).await?);
            }
            return Ok(Some(node));
        }
        Ok(None)
    }

    pub async fn collect<S: NodeStore>(
        mut self,
        store: &S,
    ) -> Result<Vec<Node>, NodeStoreError<S::Error>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.next(store).await? {
            nodes.push(node);
        }
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MemoryNodeStore, RootContainer};

    #[tokio::test]
    async fn test_walk_survives_deep_chains() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();

        let top = store
            .insert(Node::folder(root.id, None, "d0"))
            .await
            .unwrap();
        let mut parent = top.id;
        for depth in 1..5_000 {
            let next = store
                .insert(Node::folder(root.id, Some(parent), format!("d{}", depth)))
                .await
                .unwrap();
            parent = next.id;
        }

        let nodes = SubtreeWalk::new(vec![top]).collect(&store).await.unwrap();
        assert_eq!(nodes.len(), 5_000);
    }

    #[tokio::test]
    async fn test_walk_dedups_overlapping_frontier() {
        let store = MemoryNodeStore::new();
        let root = store.create_root(RootContainer::default()).await.unwrap();

        let a = store.insert(Node::folder(root.id, None, "a")).await.unwrap();
        let b = store
            .insert(Node::folder(root.id, Some(a.id), "b"))
            .await
            .unwrap();

        // `b` is both in the frontier and below `a`
        let nodes = SubtreeWalk::new(vec![a, b]).collect(&store).await.unwrap();
        assert_eq!(nodes.len(), 2);
    }
}
