//! Behavioural checks every [`NodeStore`] implementation must pass
//!
//! Each check gets a fresh store from the caller's factory, so the same
//! suite runs against the in-memory provider here and the SQLite provider
//! in the daemon.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_database_conforms() {
//!     common::testkit::check_node_store(|| async {
//!         Database::connect(&Url::parse("sqlite::memory:").unwrap())
//!             .await
//!             .unwrap()
//!     })
//!     .await;
//! }
//! ```

use std::future::Future;

use uuid::Uuid;

use crate::node::{Content, Node, NodeKind, NodeStore, NodeStoreError, NodeUpdate, RootContainer};

/// Run the full suite
pub async fn check_node_store<S, F, Fut>(make: F)
where
    S: NodeStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    check_root_is_created_once(make().await).await;
    check_insert_parent_rules(make().await).await;
    check_insert_conflict(make().await).await;
    check_update(make().await).await;
    check_delete(make().await).await;
    check_listings(make().await).await;
    check_search(make().await).await;
    check_seed(make().await).await;
    check_concurrent_seed(make().await).await;
}

async fn root_of<S: NodeStore>(store: &S) -> RootContainer {
    store
        .create_root(RootContainer::default())
        .await
        .expect("create root")
}

fn sorted_names(mut nodes: Vec<Node>) -> Vec<String> {
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    nodes.into_iter().map(|node| node.name).collect()
}

pub async fn check_root_is_created_once<S: NodeStore>(store: S) {
    assert_eq!(store.root().await.expect("read root"), None);

    let first = root_of(&store).await;
    let second = store
        .create_root(RootContainer::new("other"))
        .await
        .expect("create root again");
    assert_eq!(first.id, second.id);
    assert_eq!(second.name, first.name);
    assert_eq!(store.root().await.expect("read root").map(|r| r.id), Some(first.id));
}

pub async fn check_insert_parent_rules<S: NodeStore>(store: S) {
    let root = root_of(&store).await;

    let docs = store
        .insert(Node::folder(root.id, None, "docs"))
        .await
        .expect("insert folder");
    let file = store
        .insert(Node::text_file(root.id, Some(docs.id), "a.txt", "a"))
        .await
        .expect("insert file under folder");
    assert_eq!(store.get(file.id).await.expect("get"), Some(file.clone()));

    match store
        .insert(Node::folder(root.id, Some(file.id), "nested"))
        .await
    {
        Err(NodeStoreError::InvalidParent(id)) => assert_eq!(id, file.id),
        other => panic!("expected InvalidParent for file parent, got {:?}", other),
    }

    let ghost = Uuid::new_v4();
    match store.insert(Node::folder(root.id, Some(ghost), "x")).await {
        Err(NodeStoreError::InvalidParent(id)) => assert_eq!(id, ghost),
        other => panic!("expected InvalidParent for missing parent, got {:?}", other),
    }

    // A deleted folder no longer accepts children
    store.delete(file.id).await.expect("delete file");
    store.delete(docs.id).await.expect("delete folder");
    match store
        .insert(Node::folder(root.id, Some(docs.id), "late"))
        .await
    {
        Err(NodeStoreError::InvalidParent(id)) => assert_eq!(id, docs.id),
        other => panic!("expected InvalidParent for deleted parent, got {:?}", other),
    }
}

pub async fn check_insert_conflict<S: NodeStore>(store: S) {
    let root = root_of(&store).await;
    let node = Node::folder(root.id, None, "docs");
    store.insert(node.clone()).await.expect("first insert");

    let mut twin = Node::file(root.id, None, "other", 3, None);
    twin.id = node.id;
    match store.insert(twin).await {
        Err(NodeStoreError::Conflict(id)) => assert_eq!(id, node.id),
        other => panic!("expected Conflict, got {:?}", other),
    }
    let stored = store.get(node.id).await.expect("get").expect("still there");
    assert_eq!(stored.kind, NodeKind::Folder);
}

pub async fn check_update<S: NodeStore>(store: S) {
    let root = root_of(&store).await;
    let node = store
        .insert(Node::file(root.id, None, "draft", 0, None))
        .await
        .expect("insert");

    let renamed = store
        .update(node.id, NodeUpdate::Rename("final".into()))
        .await
        .expect("rename");
    assert_eq!(renamed.name, "final");
    assert!(renamed.updated_at > node.updated_at);
    assert_eq!(renamed.created_at, node.created_at);

    let replaced = store
        .update(
            node.id,
            NodeUpdate::Content {
                size: 7,
                content: Some(Content::Reference("files/x_final".into())),
            },
        )
        .await
        .expect("replace content");
    assert_eq!(replaced.size, 7);
    assert_eq!(replaced.content_ref(), Some("files/x_final"));
    assert!(replaced.updated_at > renamed.updated_at);
    assert_eq!(store.get(node.id).await.expect("get"), Some(replaced));

    // Never an upsert
    store.delete(node.id).await.expect("delete");
    match store
        .update(node.id, NodeUpdate::Rename("ghost".into()))
        .await
    {
        Err(NodeStoreError::NotFound(id)) => assert_eq!(id, node.id),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(store.get(node.id).await.expect("get"), None);
}

pub async fn check_delete<S: NodeStore>(store: S) {
    let root = root_of(&store).await;
    let a = store
        .insert(Node::folder(root.id, None, "a"))
        .await
        .expect("insert");
    let b = store
        .insert(Node::file(root.id, None, "b", 1, None))
        .await
        .expect("insert");

    assert!(store.delete(a.id).await.expect("delete"));
    assert!(!store.delete(a.id).await.expect("delete again"));

    let ghost = Uuid::new_v4();
    let removed = store
        .delete_many(&[b.id, ghost, a.id])
        .await
        .expect("delete many");
    assert_eq!(removed, vec![b.id]);
    assert!(store.top_level(root.id).await.expect("top level").is_empty());
}

pub async fn check_listings<S: NodeStore>(store: S) {
    let root = root_of(&store).await;
    let music = store
        .insert(Node::folder(root.id, None, "Music"))
        .await
        .expect("insert");
    store
        .insert(Node::folder(root.id, None, "Pictures"))
        .await
        .expect("insert");
    store
        .insert(Node::file(root.id, Some(music.id), "a.mp3", 10, None))
        .await
        .expect("insert");
    store
        .insert(Node::file(root.id, Some(music.id), "b.mp3", 20, None))
        .await
        .expect("insert");

    let top = store.top_level(root.id).await.expect("top level");
    assert_eq!(sorted_names(top), vec!["Music", "Pictures"]);

    let children = store.children(music.id).await.expect("children");
    assert!(children.iter().all(|node| node.parent_id == Some(music.id)));
    assert_eq!(sorted_names(children), vec!["a.mp3", "b.mp3"]);

    assert!(store
        .children(Uuid::new_v4())
        .await
        .expect("children of unknown")
        .is_empty());
}

pub async fn check_search<S: NodeStore>(store: S) {
    let root = root_of(&store).await;
    let docs = store
        .insert(Node::folder(root.id, None, "Reports"))
        .await
        .expect("insert");
    store
        .insert(Node::file(root.id, Some(docs.id), "q1-report.pdf", 1, None))
        .await
        .expect("insert");
    store
        .insert(Node::file(root.id, None, "notes.txt", 1, None))
        .await
        .expect("insert");
    store
        .insert(Node::file(root.id, None, "100%_done", 1, None))
        .await
        .expect("insert");

    let hits = store.search(root.id, "report").await.expect("search");
    assert_eq!(sorted_names(hits), vec!["q1-report.pdf"]);

    let hits = store.search(root.id, "Report").await.expect("search");
    assert_eq!(sorted_names(hits), vec!["Reports"]);

    // Pattern characters are literal
    let hits = store.search(root.id, "%_").await.expect("search");
    assert_eq!(sorted_names(hits), vec!["100%_done"]);

    assert!(store
        .search(root.id, "missing")
        .await
        .expect("search")
        .is_empty());
}

pub async fn check_seed<S: NodeStore>(store: S) {
    let root = root_of(&store).await;

    let folder = Node::folder(root.id, None, "files");
    let inside = Node::text_file(root.id, Some(folder.id), "inside.txt", "x");
    assert!(store
        .seed_top_level(root.id, vec![folder.clone(), inside.clone()])
        .await
        .expect("seed"));
    assert!(!store
        .seed_top_level(root.id, vec![Node::folder(root.id, None, "files")])
        .await
        .expect("second seed"));

    let top = store.top_level(root.id).await.expect("top level");
    assert_eq!(top, vec![folder.clone()]);
    assert_eq!(
        store.children(folder.id).await.expect("children"),
        vec![inside]
    );
}

pub async fn check_concurrent_seed<S: NodeStore>(store: S) {
    let root = root_of(&store).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let root_id = root.id;
        handles.push(tokio::spawn(async move {
            store
                .seed_top_level(root_id, vec![Node::folder(root_id, None, "files")])
                .await
        }));
    }

    let mut seeded = 0;
    for handle in handles {
        if handle.await.expect("join").expect("seed") {
            seeded += 1;
        }
    }
    assert_eq!(seeded, 1);
    assert_eq!(store.top_level(root.id).await.expect("top level").len(), 1);
}
