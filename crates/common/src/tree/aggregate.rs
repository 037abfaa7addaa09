use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::{NodeStore, RootContainer};

use super::error::TreeError;
use super::walk::SubtreeWalk;

/// Descendant count and cumulative file size of a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeStats {
    pub count: u64,
    pub size: u64,
}

/// Aggregate everything below `id`.
///
/// * the root container id covers the whole tree
/// * a folder counts every transitive descendant, files and folders alike,
///   and sums the sizes of the files among them
/// * a file has no descendants: `count = 0`, `size` is its own size
pub async fn subtree_stats<S: NodeStore>(
    store: &S,
    root: &RootContainer,
    id: Uuid,
) -> Result<SubtreeStats, TreeError> {
    let frontier = if id == root.id {
        store.top_level(root.id).await?
    } else {
        let node = store.get(id).await?.ok_or(TreeError::NotFound(id))?;
        if node.is_file() {
            return Ok(SubtreeStats {
                count: 0,
                size: node.size,
            });
        }
        store.children(id).await?
    };

    let mut walk = SubtreeWalk::new(frontier);
    let mut stats = SubtreeStats::default();
    while let Some(node) = walk.next(store).await? {
        stats.count += 1;
        if node.is_file() {
            stats.size += node.size;
        }
    }

    tracing::debug!(%id, count = stats.count, size = stats.size, "aggregated subtree");
    Ok(stats)
}
