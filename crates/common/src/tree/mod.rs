//! Tree rules over a [`NodeStore`](crate::node::NodeStore)
//!
//! - [`Tree`]: mutations with parent checks and cascading delete
//! - [`subtree_stats`]: descendant count and size aggregation
//! - [`Bootstrapper`]: root container creation and first-read seeding
//! - [`SubtreeWalk`]: the iterative walk the other pieces share

mod aggregate;
mod bootstrap;
mod error;
#[allow(clippy::module_inception)]
mod tree;
mod walk;

pub use aggregate::{subtree_stats, SubtreeStats};
pub use bootstrap::{BootstrapState, Bootstrapper, SeedConfig, SEED_FILE_NAME, SEED_FOLDER_NAME};
pub use error::{ErrorKind, TreeError};
pub use tree::{DeleteSummary, Tree};
pub use walk::SubtreeWalk;
