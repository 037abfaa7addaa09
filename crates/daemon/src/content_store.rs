//! Content storage backed by the `object_store` crate (memory or local disk).

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use common::content::{content_reference, ContentStore};

use crate::state::ContentStoreConfig;

#[derive(Debug, Clone)]
pub struct ObjectContentStore {
    inner: Arc<dyn ObjectStore>,
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectContentStoreError {
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
    #[error("invalid content reference: {0}")]
    InvalidReference(#[from] object_store::path::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjectContentStore {
    /// Build the backend described by `config`. A filesystem store without
    ///  an explicit path lands in `default_dir`.
    pub async fn new(
        config: &ContentStoreConfig,
        default_dir: PathBuf,
    ) -> Result<Self, ObjectContentStoreError> {
        let inner: Arc<dyn ObjectStore> = match config {
            ContentStoreConfig::Memory => Arc::new(InMemory::new()),
            ContentStoreConfig::Filesystem { path } => {
                let path = path.clone().unwrap_or(default_dir);
                tokio::fs::create_dir_all(&path).await?;
                tracing::info!(path = %path.display(), "using filesystem content store");
                Arc::new(LocalFileSystem::new_with_prefix(&path)?)
            }
        };
        Ok(Self { inner })
    }

    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }
}

#[async_trait]
impl ContentStore for ObjectContentStore {
    type Error = ObjectContentStoreError;

    async fn put(&self, name: &str, data: Bytes) -> Result<String, Self::Error> {
        let reference = content_reference(name);
        let path = ObjectPath::parse(&reference)?;
        self.inner.put(&path, data.into()).await?;
        tracing::debug!(%reference, "stored content");
        Ok(reference)
    }

    async fn get(&self, reference: &str) -> Result<Option<Bytes>, Self::Error> {
        let path = ObjectPath::parse(reference)?;
        match self.inner.get(&path).await {
            Ok(result) => Ok(Some(result.bytes().await?)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, reference: &str) -> Result<(), Self::Error> {
        let path = ObjectPath::parse(reference)?;
        match self.inner.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_filesystem_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectContentStore::new(
            &ContentStoreConfig::Filesystem { path: None },
            dir.path().join("content"),
        )
        .await
        .unwrap();

        let reference = store
            .put("report final.pdf", Bytes::from_static(b"%PDF-1.7"))
            .await
            .unwrap();
        assert_eq!(
            store.get(&reference).await.unwrap(),
            Some(Bytes::from_static(b"%PDF-1.7"))
        );
        assert!(dir.path().join("content").join("files").exists());

        store.delete(&reference).await.unwrap();
        assert_eq!(store.get(&reference).await.unwrap(), None);
        // Deleting twice is not an error
        store.delete(&reference).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_reference_is_none() {
        let store = ObjectContentStore::memory();
        assert_eq!(store.get("files/nothing_here").await.unwrap(), None);
    }
}
