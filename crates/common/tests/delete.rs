//! Integration tests for cascading delete

mod common;

use ::common::prelude::*;
use futures::future::join_all;

#[tokio::test]
async fn test_delete_folder_removes_every_descendant() {
    let service = common::setup_service();
    let listing = service.list_root().await.unwrap();
    let files = listing.nodes[0].clone();

    let mut descendants = Vec::new();
    let mut parent = files.id;
    for depth in 0..20 {
        let folder = service
            .create(Some(parent), &format!("level-{}", depth), NodeKind::Folder)
            .await
            .unwrap();
        let file = service
            .create_file(Some(folder.id), "leaf.txt", Some("leaf".into()))
            .await
            .unwrap();
        descendants.push(folder.id);
        descendants.push(file.id);
        parent = folder.id;
    }

    let summary = service.delete(&[files.id]).await.unwrap();
    assert_eq!(summary.requested, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.descendants_deleted, descendants.len());

    for id in descendants {
        let result = service.get_node(id).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
    assert!(common::all_nodes(&service).await.is_empty());
}

#[tokio::test]
async fn test_delete_ignores_unknown_and_root_ids() {
    let service = common::setup_service();
    let listing = service.list_root().await.unwrap();

    let summary = service
        .delete(&[listing.root_id, uuid::Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(summary.requested, 2);
    assert_eq!(summary.deleted, 0);
    assert_eq!(summary.descendants_deleted, 0);
    assert_eq!(service.list_root().await.unwrap(), listing);
}

#[tokio::test]
async fn test_creates_racing_a_delete_leave_no_orphans() {
    let service = common::setup_service();
    let folder = service
        .create(None, "busy", NodeKind::Folder)
        .await
        .unwrap();
    for i in 0..10 {
        service
            .create_file(Some(folder.id), &format!("{}.txt", i), None)
            .await
            .unwrap();
    }

    let creates = (0..50).map(|i| {
        let service = service.clone();
        let parent = folder.id;
        tokio::spawn(async move {
            service
                .create_file(Some(parent), &format!("late-{}.txt", i), None)
                .await
        })
    });
    let delete = {
        let service = service.clone();
        let id = folder.id;
        tokio::spawn(async move { service.delete(&[id]).await })
    };

    let results = join_all(creates).await;
    delete.await.unwrap().unwrap();

    for result in results {
        // Either it landed before the sweep or the parent was already gone
        match result.unwrap() {
            Ok(_) => {}
            Err(err) => assert_eq!(err.kind(), ErrorKind::InvalidParent),
        }
    }

    common::assert_tree_invariants(&service).await;
    assert_eq!(
        service.get_node(folder.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_rename_after_delete_is_not_found() {
    let service = common::setup_service();
    let node = service
        .create_file(None, "doomed.txt", None)
        .await
        .unwrap();
    service.delete(&[node.id]).await.unwrap();

    let result = service.rename(node.id, "saved.txt").await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    assert!(common::all_nodes(&service).await.is_empty());
}
