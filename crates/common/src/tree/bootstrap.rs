use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::node::{Node, NodeStore, RootContainer};

use super::error::TreeError;

pub const SEED_FOLDER_NAME: &str = "files";
pub const SEED_FILE_NAME: &str = "welcome.txt";
const SEED_FILE_TEXT: &str = "Files and folders you create show up here.\n";

/// What gets planted into an empty top level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Also seed a top-level `welcome.txt` beside the default folder
    #[serde(default)]
    pub sample_file: bool,
}

impl SeedConfig {
    pub fn nodes(&self, root_id: Uuid) -> Vec<Node> {
        let mut nodes = vec![Node::folder(root_id, None, SEED_FOLDER_NAME)];
        if self.sample_file {
            nodes.push(Node::text_file(
                root_id,
                None,
                SEED_FILE_NAME,
                SEED_FILE_TEXT,
            ));
        }
        nodes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    Uninitialized,
    Ready(RootContainer),
}

/// Makes sure exactly one root container exists and the top level is
///  never read back empty.
///
/// Local initializers queue on an async mutex; racing processes are
///  settled by the store's create-if-absent primitive, and the loser
///  adopts whichever root survived.
#[derive(Debug)]
pub struct Bootstrapper<S> {
    store: S,
    seed: SeedConfig,
    state: Mutex<BootstrapState>,
}

impl<S: NodeStore> Bootstrapper<S> {
    pub fn new(store: S, seed: SeedConfig) -> Self {
        Self {
            store,
            seed,
            state: Mutex::new(BootstrapState::Uninitialized),
        }
    }

    pub async fn state(&self) -> BootstrapState {
        self.state.lock().await.clone()
    }

    /// Resolve the root container, creating it on first use
    pub async fn root(&self) -> Result<RootContainer, TreeError> {
        let mut state = self.state.lock().await;
        if let BootstrapState::Ready(root) = &*state {
            return Ok(root.clone());
        }

        let root = match self.store.root().await? {
            Some(root) => root,
            None => {
                let candidate = RootContainer::default();
                let root = self.store.create_root(candidate.clone()).await?;
                if root.id == candidate.id {
                    tracing::info!(root_id = %root.id, "created root container");
                } else {
                    tracing::debug!(root_id = %root.id, "adopted concurrently created root");
                }
                root
            }
        };

        *state = BootstrapState::Ready(root.clone());
        Ok(root)
    }

    /// Plant the seed if the top level is empty right now. Returns
    ///  whether this call did the seeding.
    pub async fn seed(&self, root: &RootContainer) -> Result<bool, TreeError> {
        let seeded = self
            .store
            .seed_top_level(root.id, self.seed.nodes(root.id))
            .await?;
        if seeded {
            tracing::info!(root_id = %root.id, "seeded empty top level");
        }
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MemoryNodeStore, NodeKind};

    #[tokio::test]
    async fn test_root_moves_to_ready_once() {
        let store = MemoryNodeStore::new();
        let bootstrapper = Bootstrapper::new(store.clone(), SeedConfig::default());
        assert_eq!(bootstrapper.state().await, BootstrapState::Uninitialized);

        let first = bootstrapper.root().await.unwrap();
        let second = bootstrapper.root().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(bootstrapper.state().await, BootstrapState::Ready(first.clone()));
        assert_eq!(store.root().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_adopts_existing_root() {
        let store = MemoryNodeStore::new();
        let existing = store.create_root(RootContainer::new("home")).await.unwrap();

        let bootstrapper = Bootstrapper::new(store, SeedConfig::default());
        assert_eq!(bootstrapper.root().await.unwrap(), existing);
    }

    #[tokio::test]
    async fn test_seed_with_sample_file() {
        let store = MemoryNodeStore::new();
        let bootstrapper = Bootstrapper::new(store.clone(), SeedConfig { sample_file: true });
        let root = bootstrapper.root().await.unwrap();

        assert!(bootstrapper.seed(&root).await.unwrap());
        assert!(!bootstrapper.seed(&root).await.unwrap());

        let mut top = store.top_level(root.id).await.unwrap();
        top.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, SEED_FOLDER_NAME);
        assert_eq!(top[0].kind, NodeKind::Folder);
        assert_eq!(top[1].name, SEED_FILE_NAME);
        assert_eq!(top[1].size, SEED_FILE_TEXT.len() as u64);
    }
}
