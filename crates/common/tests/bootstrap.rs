//! Integration tests for first-read root creation and seeding

mod common;

use ::common::prelude::*;
use ::common::tree::SEED_FOLDER_NAME;
use futures::future::join_all;

#[tokio::test]
async fn test_concurrent_list_root_on_empty_store() {
    let service = common::setup_service();

    let listings = join_all((0..16).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.list_root().await.unwrap() })
    }))
    .await;

    let listings: Vec<RootListing> = listings.into_iter().map(|r| r.unwrap()).collect();
    let root_id = listings[0].root_id;
    for listing in &listings {
        assert_eq!(listing.root_id, root_id);
        assert_eq!(listing.nodes.len(), 1);
        assert_eq!(listing.nodes[0].name, SEED_FOLDER_NAME);
    }
    assert_eq!(common::all_nodes(&service).await.len(), 1);
}

#[tokio::test]
async fn test_services_sharing_a_store_agree_on_root() {
    // Separate services have separate bootstrappers, like separate processes
    let store = MemoryNodeStore::new();
    let services: Vec<_> = (0..8)
        .map(|_| common::setup_service_with_store(store.clone()))
        .collect();

    let listings = join_all(services.iter().map(|service| service.list_root())).await;
    let listings: Vec<RootListing> = listings.into_iter().map(|r| r.unwrap()).collect();

    let root_id = listings[0].root_id;
    assert!(listings.iter().all(|listing| listing.root_id == root_id));

    let root = store.root().await.unwrap().unwrap();
    assert_eq!(root.id, root_id);
    assert_eq!(store.top_level(root_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_seed_is_not_repeated_while_top_level_is_populated() {
    let service = common::setup_service();
    let first = service.list_root().await.unwrap();

    service
        .create(None, "extra", NodeKind::Folder)
        .await
        .unwrap();
    let seed_id = first.nodes[0].id;
    service.delete(&[seed_id]).await.unwrap();

    let listing = service.list_root().await.unwrap();
    assert_eq!(listing.nodes.len(), 1);
    assert_eq!(listing.nodes[0].name, "extra");
}

#[tokio::test]
async fn test_emptied_top_level_is_reseeded() {
    let service = common::setup_service();
    let first = service.list_root().await.unwrap();
    service.delete(&[first.nodes[0].id]).await.unwrap();

    let listing = service.list_root().await.unwrap();
    assert_eq!(listing.root_id, first.root_id);
    assert_eq!(listing.nodes.len(), 1);
    assert_eq!(listing.nodes[0].name, SEED_FOLDER_NAME);
    assert_ne!(listing.nodes[0].id, first.nodes[0].id);
}

#[tokio::test]
async fn test_sample_file_seed() {
    let service = FileService::new(
        MemoryNodeStore::new(),
        MemoryContentStore::new(),
        SeedConfig { sample_file: true },
    );
    let listing = service.list_root().await.unwrap();
    assert_eq!(listing.nodes.len(), 2);

    let info = service.get_info(listing.root_id).await.unwrap();
    assert_eq!(info.count, 2);
    assert!(info.size > 0);
}
