//! Shared test utilities for tree integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use common::prelude::*;
use common::tree::SubtreeWalk;
use uuid::Uuid;

pub type TestService = FileService<MemoryNodeStore, MemoryContentStore>;

/// Set up a service over fresh in-memory stores with the default seed
pub fn setup_service() -> TestService {
    setup_service_with_store(MemoryNodeStore::new())
}

/// Set up a service over an existing store, e.g. to share it between
///  several services the way separate processes share a database
pub fn setup_service_with_store(store: MemoryNodeStore) -> TestService {
    FileService::new(store, MemoryContentStore::new(), SeedConfig::default())
}

/// Every node in the tree, reachable or not
pub async fn all_nodes(service: &TestService) -> Vec<Node> {
    let root = service.root().await.unwrap();
    // The empty string is a substring of every name
    service.store().search(root.id, "").await.unwrap()
}

/// Check the structural invariants over the whole store:
/// * every parent reference names a live folder
/// * every node belongs to the root container
/// * folders have no size of their own
/// * nothing is unreachable from the top level
pub async fn assert_tree_invariants(service: &TestService) {
    let root = service.root().await.unwrap();
    let nodes = all_nodes(service).await;
    let by_id: HashMap<Uuid, &Node> = nodes.iter().map(|node| (node.id, node)).collect();

    for node in &nodes {
        assert_eq!(node.root_id, root.id, "{} has a foreign root", node.id);
        if node.is_folder() {
            assert_eq!(node.size, 0, "folder {} carries a size", node.id);
            assert!(node.content.is_none(), "folder {} carries content", node.id);
        }
        if let Some(parent_id) = node.parent_id {
            let parent = by_id
                .get(&parent_id)
                .unwrap_or_else(|| panic!("{} points at missing parent {}", node.id, parent_id));
            assert!(parent.is_folder(), "{} has a file parent", node.id);
        }
    }

    let top = service.store().top_level(root.id).await.unwrap();
    let reachable: HashSet<Uuid> = SubtreeWalk::new(top)
        .collect(service.store())
        .await
        .unwrap()
        .into_iter()
        .map(|node| node.id)
        .collect();
    assert_eq!(reachable.len(), nodes.len(), "unreachable nodes in store");
}
