use url::Url;

use common::prelude::{FileService, SeedConfig};

use crate::content_store::{ObjectContentStore, ObjectContentStoreError};
use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;
use crate::state::CONTENT_DIR_NAME;

pub type Files = FileService<Database, ObjectContentStore>;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    files: Files,
    search_min_len: usize,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup content store
        let content = ObjectContentStore::new(
            &config.content_store,
            config.dir.join(CONTENT_DIR_NAME),
        )
        .await?;

        Ok(Self::from_parts(
            database,
            content,
            config.seed.clone(),
            config.search_min_len,
        ))
    }

    pub fn from_parts(
        database: Database,
        content: ObjectContentStore,
        seed: SeedConfig,
        search_min_len: usize,
    ) -> Self {
        let files = FileService::new(database.clone(), content, seed);
        Self {
            database,
            files,
            search_min_len,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn files(&self) -> &Files {
        &self.files
    }

    pub fn search_min_len(&self) -> usize {
        self.search_min_len
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        &self.database
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Content store error: {0}")]
    ContentStoreError(#[from] ObjectContentStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_database_path_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            sqlite_path: Some(tmp.path().join("nope.sqlite")),
            ..Config::ephemeral()
        };
        let result = State::from_config(&config).await;
        assert!(matches!(result, Err(StateSetupError::DatabasePathDoesNotExist)));
    }

    #[tokio::test]
    async fn test_on_disk_state_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("db.sqlite");
        std::fs::write(&db_path, "").unwrap();
        let config = Config {
            dir: tmp.path().to_path_buf(),
            sqlite_path: Some(db_path),
            content_store: crate::state::ContentStoreConfig::Filesystem { path: None },
            ..Config::ephemeral()
        };

        let first = State::from_config(&config).await.unwrap();
        let listing = first.files().list_root().await.unwrap();
        let note = first
            .files()
            .upload_bytes(Some(listing.root_id), "a.bin", bytes::Bytes::from_static(b"abc"))
            .await
            .unwrap();
        drop(first);

        let second = State::from_config(&config).await.unwrap();
        let again = second.files().list_root().await.unwrap();
        assert_eq!(again.root_id, listing.root_id);
        assert_eq!(second.files().get_node(note.id).await.unwrap(), note);
        assert!(tmp.path().join(CONTENT_DIR_NAME).is_dir());
    }
}
