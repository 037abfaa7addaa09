//! Tree data model and storage abstraction
//!
//! - **[`Node`]**: a single file or folder record. Folders never carry a size
//!   of their own; their size is always derived by walking the subtree.
//! - **[`RootContainer`]**: the one anchor object per store. Every node
//!   records the id of the root container it belongs to.
//! - **[`NodeStore`]**: the storage contract. Lookup by id, listing by parent,
//!   atomic create/update and a bulk delete sweep.
//! - **[`MemoryNodeStore`]**: an in-process provider used by tests and
//!   embedders that don't need durability.
//!
//! # Parent relation
//!
//! The tree is an adjacency list: a node only knows its `parent_id`. Stores
//! maintain the reverse index (parent -> children) themselves, so callers
//! never hold object graphs that point back at each other.
//!
//! ```text
//! RootContainer
//!   |-- files/          (parent_id = None)
//!   |     `-- a.txt     (parent_id = files)
//!   `-- notes.txt       (parent_id = None)
//! ```

mod memory;
#[allow(clippy::module_inception)]
mod node;
mod provider;

pub use memory::{MemoryNodeStore, MemoryNodeStoreError};
pub use node::{Content, Node, NodeKind, NodeKindError, NodeUpdate, RootContainer};
pub use provider::{NodeStore, NodeStoreError};
