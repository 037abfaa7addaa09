use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};
use time::OffsetDateTime;
use uuid::Uuid;

use common::node::{Content, Node, NodeKind, NodeStore, NodeStoreError, NodeUpdate, RootContainer};

use crate::database::types::{DTimestamp, DUuid};
use crate::database::Database;

const NODE_COLUMNS: &str =
    "id, root_id, parent_id, name, kind, size, content_ref, content_text, created_at, updated_at";

// The parent check and the write are one statement, so a folder deleted
//  concurrently can never gain a child
const INSERT_NODE: &str = r#"
    INSERT INTO nodes
        (id, root_id, parent_id, name, kind, size,
         content_ref, content_text, created_at, updated_at)
    SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
    WHERE ?3 IS NULL
       OR EXISTS (SELECT 1 FROM nodes WHERE id = ?3 AND kind = 'folder')
"#;

const INSERT_SEED_NODE: &str = r#"
    INSERT INTO nodes
        (id, root_id, parent_id, name, kind, size,
         content_ref, content_text, created_at, updated_at)
    SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
    WHERE (?3 IS NULL
       OR EXISTS (SELECT 1 FROM nodes WHERE id = ?3 AND kind = 'folder'))
      AND NOT EXISTS (SELECT 1 FROM nodes WHERE root_id = ?2 AND parent_id IS NULL)
"#;

// updated_at only moves forward, by at least a microsecond
const RENAME_NODE: &str = r#"
    UPDATE nodes
    SET name = ?1, updated_at = MAX(?2, updated_at + 1000)
    WHERE id = ?3
"#;

const SET_CONTENT: &str = r#"
    UPDATE nodes
    SET size = ?1, content_ref = ?2, content_text = ?3, updated_at = MAX(?4, updated_at + 1000)
    WHERE id = ?5
"#;

fn decode_error(e: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

fn node_from_row(row: &SqliteRow) -> Result<Node, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    let size: i64 = row.try_get("size")?;
    let content_ref: Option<String> = row.try_get("content_ref")?;
    let content_text: Option<String> = row.try_get("content_text")?;

    let content = match (content_ref, content_text) {
        (Some(reference), _) => Some(Content::Reference(reference)),
        (None, Some(text)) => Some(Content::Text(text)),
        (None, None) => None,
    };

    Ok(Node {
        id: row.try_get::<DUuid, _>("id")?.into(),
        root_id: row.try_get::<DUuid, _>("root_id")?.into(),
        parent_id: row.try_get::<Option<DUuid>, _>("parent_id")?.map(Into::into),
        name: row.try_get("name")?,
        kind: kind.parse::<NodeKind>().map_err(decode_error)?,
        size: u64::try_from(size).map_err(decode_error)?,
        content,
        created_at: row.try_get::<DTimestamp, _>("created_at")?.into(),
        updated_at: row.try_get::<DTimestamp, _>("updated_at")?.into(),
    })
}

fn root_from_row(row: &SqliteRow) -> Result<RootContainer, sqlx::Error> {
    Ok(RootContainer {
        id: row.try_get::<DUuid, _>("id")?.into(),
        name: row.try_get("name")?,
        created_at: row.try_get::<DTimestamp, _>("created_at")?.into(),
        updated_at: row.try_get::<DTimestamp, _>("updated_at")?.into(),
    })
}

fn split_content(content: &Option<Content>) -> (Option<&str>, Option<&str>) {
    match content {
        Some(Content::Reference(reference)) => (Some(reference.as_str()), None),
        Some(Content::Text(text)) => (None, Some(text.as_str())),
        None => (None, None),
    }
}

fn db_size(size: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(size).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Run one guarded insert and report how many rows landed.
///
/// Unique violations surface as `Conflict`; zero rows means the guard
///  rejected the write.
async fn insert_row<'c, E>(
    executor: E,
    sql: &str,
    node: &Node,
) -> Result<u64, NodeStoreError<sqlx::Error>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let (content_ref, content_text) = split_content(&node.content);
    let result = sqlx::query(sql)
        .bind(DUuid::from(node.id))
        .bind(DUuid::from(node.root_id))
        .bind(node.parent_id.map(DUuid::from))
        .bind(node.name.as_str())
        .bind(node.kind.as_str())
        .bind(db_size(node.size)?)
        .bind(content_ref)
        .bind(content_text)
        .bind(DTimestamp::from(node.created_at))
        .bind(DTimestamp::from(node.updated_at))
        .execute(executor)
        .await;

    match result {
        Ok(result) => Ok(result.rows_affected()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(NodeStoreError::Conflict(node.id))
        }
        Err(e) => Err(NodeStoreError::Provider(e)),
    }
}

impl Database {
    async fn select_nodes(
        &self,
        filter: &str,
        binds: &[&str],
    ) -> Result<Vec<Node>, NodeStoreError<sqlx::Error>> {
        let sql = format!("SELECT {} FROM nodes WHERE {}", NODE_COLUMNS, filter);
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&**self).await?;
        Ok(rows
            .iter()
            .map(node_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl NodeStore for Database {
    type Error = sqlx::Error;

    async fn root(&self) -> Result<Option<RootContainer>, NodeStoreError<Self::Error>> {
        let row = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM root_container WHERE slot = 0",
        )
        .fetch_optional(&**self)
        .await?;
        Ok(row.as_ref().map(root_from_row).transpose()?)
    }

    async fn create_root(
        &self,
        root: RootContainer,
    ) -> Result<RootContainer, NodeStoreError<Self::Error>> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO root_container (slot, id, name, created_at, updated_at)
            VALUES (0, ?, ?, ?, ?)
            "#,
        )
        .bind(DUuid::from(root.id))
        .bind(root.name.as_str())
        .bind(DTimestamp::from(root.created_at))
        .bind(DTimestamp::from(root.updated_at))
        .execute(&**self)
        .await?;

        // Whoever won the slot is the root
        self.root()
            .await?
            .ok_or(NodeStoreError::Provider(sqlx::Error::RowNotFound))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Node>, NodeStoreError<Self::Error>> {
        let sql = format!("SELECT {} FROM nodes WHERE id = ?", NODE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(DUuid::from(id))
            .fetch_optional(&**self)
            .await?;
        Ok(row.as_ref().map(node_from_row).transpose()?)
    }

    async fn insert(&self, node: Node) -> Result<Node, NodeStoreError<Self::Error>> {
        let inserted = insert_row(&**self, INSERT_NODE, &node).await?;
        if inserted == 0 {
            // The guard only fails when a parent was named
            return Err(NodeStoreError::InvalidParent(
                node.parent_id.unwrap_or(node.id),
            ));
        }
        Ok(node)
    }

    async fn update(
        &self,
        id: Uuid,
        update: NodeUpdate,
    ) -> Result<Node, NodeStoreError<Self::Error>> {
        // One statement per update, so writers on the same id serialize
        //  on the row and the last one wins
        let now = DTimestamp::from(OffsetDateTime::now_utc());
        let row = match &update {
            NodeUpdate::Rename(name) => {
                let sql = format!("{} RETURNING {}", RENAME_NODE, NODE_COLUMNS);
                sqlx::query(&sql)
                    .bind(name.as_str())
                    .bind(now)
                    .bind(DUuid::from(id))
                    .fetch_optional(&**self)
                    .await?
            }
            NodeUpdate::Content { size, content } => {
                let (content_ref, content_text) = split_content(content);
                let sql = format!("{} RETURNING {}", SET_CONTENT, NODE_COLUMNS);
                sqlx::query(&sql)
                    .bind(db_size(*size)?)
                    .bind(content_ref)
                    .bind(content_text)
                    .bind(now)
                    .bind(DUuid::from(id))
                    .fetch_optional(&**self)
                    .await?
            }
        };

        let row = row.ok_or(NodeStoreError::NotFound(id))?;
        Ok(node_from_row(&row)?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, NodeStoreError<Self::Error>> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = ?")
            .bind(DUuid::from(id))
            .execute(&**self)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, NodeStoreError<Self::Error>> {
        let mut tx = self.begin().await?;
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            let result = sqlx::query("DELETE FROM nodes WHERE id = ?")
                .bind(DUuid::from(*id))
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                removed.push(*id);
            }
        }
        tx.commit().await?;
        Ok(removed)
    }

    async fn top_level(&self, root_id: Uuid) -> Result<Vec<Node>, NodeStoreError<Self::Error>> {
        let root_id = root_id.hyphenated().to_string();
        self.select_nodes("root_id = ? AND parent_id IS NULL", &[root_id.as_str()])
            .await
    }

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Node>, NodeStoreError<Self::Error>> {
        let parent_id = parent_id.hyphenated().to_string();
        self.select_nodes("parent_id = ?", &[parent_id.as_str()])
            .await
    }

    async fn search(
        &self,
        root_id: Uuid,
        query: &str,
    ) -> Result<Vec<Node>, NodeStoreError<Self::Error>> {
        // instr is a case-sensitive, literal substring test
        let root_id = root_id.hyphenated().to_string();
        self.select_nodes("root_id = ? AND instr(name, ?) > 0", &[root_id.as_str(), query])
            .await
    }

    async fn seed_top_level(
        &self,
        root_id: Uuid,
        nodes: Vec<Node>,
    ) -> Result<bool, NodeStoreError<Self::Error>> {
        let Some((first, rest)) = nodes.split_first() else {
            return Ok(false);
        };

        let mut tx = self.begin().await?;

        // The first write takes the lock and checks the top level in the
        //  same statement; losing racers see a populated tree here
        if insert_row(&mut *tx, INSERT_SEED_NODE, first).await? == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for node in rest {
            if insert_row(&mut *tx, INSERT_NODE, node).await? == 0 {
                tx.rollback().await?;
                return Err(NodeStoreError::InvalidParent(
                    node.parent_id.unwrap_or(node.id),
                ));
            }
        }

        tx.commit().await?;
        tracing::debug!(%root_id, count = nodes.len(), "seeded top level");
        Ok(true)
    }
}
