use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

/// Opaque byte storage behind file nodes.
///
/// The tree never looks inside a store; it only keeps the reference string
///  `put` hands back.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store `data` and return a reference for it. `name` is a hint for
    ///  building readable references and carries no meaning otherwise.
    async fn put(&self, name: &str, data: Bytes) -> Result<String, Self::Error>;

    /// Fetch bytes by reference. `Ok(None)` if nothing is stored there.
    async fn get(&self, reference: &str) -> Result<Option<Bytes>, Self::Error>;

    /// Drop whatever is stored at `reference`. Missing references are fine.
    async fn delete(&self, reference: &str) -> Result<(), Self::Error>;
}

/// Build a fresh reference of the form `files/<uuid>_<name>`.
///
/// Slashes in the name would read as extra path segments to object
///  stores, so they are flattened.
pub fn content_reference(name: &str) -> String {
    let name = name.replace(['/', '\\'], "_");
    format!("files/{}_{}", Uuid::new_v4().simple(), name)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<RwLock<HashMap<String, Bytes>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryContentStoreError {
    #[error("memory content store error: {0}")]
    Internal(String),
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    type Error = MemoryContentStoreError;

    async fn put(&self, name: &str, data: Bytes) -> Result<String, Self::Error> {
        let reference = content_reference(name);
        let mut inner = self.inner.write().map_err(|e| {
            MemoryContentStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })?;
        inner.insert(reference.clone(), data);
        Ok(reference)
    }

    async fn get(&self, reference: &str) -> Result<Option<Bytes>, Self::Error> {
        let inner = self.inner.read().map_err(|e| {
            MemoryContentStoreError::Internal(format!("failed to acquire read lock: {}", e))
        })?;
        Ok(inner.get(reference).cloned())
    }

    async fn delete(&self, reference: &str) -> Result<(), Self::Error> {
        let mut inner = self.inner.write().map_err(|e| {
            MemoryContentStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })?;
        inner.remove(reference);
        Ok(())
    }
}

impl MemoryContentStore {
    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
