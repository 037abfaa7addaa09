/**
 * Opaque content storage for file bytes.
 *  Nodes only ever hold a reference string
 *  into one of these stores.
 */
pub mod content;
/**
 * The tree data model and the node store
 *  abstraction every backend implements.
 */
pub mod node;
/**
 * Query/mutation facade composing the tree
 *  engine, aggregator and bootstrapper.
 */
pub mod service;
/**
 * Integrity rules, subtree walks, aggregation
 *  and root bootstrapping over a node store.
 */
pub mod tree;
/**
 * Helper for reporting build version information.
 */
pub mod version;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub mod prelude {
    pub use crate::content::{ContentStore, MemoryContentStore};
    pub use crate::node::{
        Content, MemoryNodeStore, Node, NodeKind, NodeStore, NodeStoreError, NodeUpdate,
        RootContainer,
    };
    pub use crate::service::{DirectContent, FileService, FileServiceError, RootListing};
    pub use crate::tree::{
        DeleteSummary, ErrorKind, SeedConfig, SubtreeStats, Tree, TreeError,
    };
    pub use crate::version::{build_info, BuildInfo};
}
