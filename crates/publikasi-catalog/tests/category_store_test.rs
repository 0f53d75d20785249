//! Category hierarchy rules exercised through the service layer.

mod common;

use common::Harness;
use publikasi_core::{CategoryInput, Error, ErrorKind, ROOT_LEVEL, SUB_LEVEL};
use uuid::Uuid;

#[tokio::test]
async fn test_create_root_and_child_levels() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    let trade = h.child("Trade", &economy).await;

    assert_eq!(economy.level, ROOT_LEVEL);
    assert_eq!(economy.parent_id, None);
    assert_eq!(trade.level, SUB_LEVEL);
    assert_eq!(trade.parent_id, Some(economy.id));
}

#[tokio::test]
async fn test_third_level_is_depth_exceeded() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    let trade = h.child("Trade", &economy).await;

    let result = h
        .catalog
        .categories
        .create(CategoryInput::new("Exports").with_parent(trade.id))
        .await;
    assert!(matches!(result, Err(Error::DepthExceeded(id)) if id == trade.id));
}

#[tokio::test]
async fn test_create_rejects_duplicate_and_missing_parent() {
    let h = Harness::new();
    h.root("Economy").await;

    let duplicate = h.catalog.categories.create(CategoryInput::new("Economy")).await;
    assert!(matches!(duplicate, Err(Error::DuplicateName(_))));

    // Names are case-sensitive
    assert!(h.catalog.categories.create(CategoryInput::new("economy")).await.is_ok());

    let orphan = h
        .catalog
        .categories
        .create(CategoryInput::new("Orphan").with_parent(Uuid::now_v7()))
        .await;
    assert!(matches!(orphan, Err(Error::ParentNotFound(_))));
}

#[tokio::test]
async fn test_blank_name_is_invalid_input() {
    let h = Harness::new();
    let err = h
        .catalog
        .categories
        .create(CategoryInput::new("   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_self_parent_wins_over_other_failures() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    h.child("Trade", &economy).await;
    h.root("Taken").await;

    // Duplicate name and existing children would also fail; self-parent is reported.
    let result = h
        .catalog
        .categories
        .update(economy.id, CategoryInput::new("Taken").with_parent(economy.id))
        .await;
    assert!(matches!(result, Err(Error::SelfParent(id)) if id == economy.id));
}

#[tokio::test]
async fn test_update_rules() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    let social = h.root("Social").await;
    let trade = h.child("Trade", &economy).await;

    let missing = h
        .catalog
        .categories
        .update(Uuid::now_v7(), CategoryInput::new("Ghost"))
        .await;
    assert!(matches!(missing, Err(Error::NotFound(_))));

    let clash = h
        .catalog
        .categories
        .update(social.id, CategoryInput::new("Economy"))
        .await;
    assert!(matches!(clash, Err(Error::DuplicateName(_))));

    // Keeping its own name is not a clash
    let renamed = h
        .catalog
        .categories
        .update(social.id, CategoryInput::new("Social").with_description("people"))
        .await
        .unwrap();
    assert_eq!(renamed.description.as_deref(), Some("people"));

    let has_children = h
        .catalog
        .categories
        .update(economy.id, CategoryInput::new("Economy").with_parent(social.id))
        .await;
    assert!(matches!(has_children, Err(Error::HasChildren(id)) if id == economy.id));

    let under_sub = h
        .catalog
        .categories
        .update(social.id, CategoryInput::new("Social").with_parent(trade.id))
        .await;
    assert!(matches!(under_sub, Err(Error::DepthExceeded(_))));
}

#[tokio::test]
async fn test_clearing_parent_promotes_to_root() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    let trade = h.child("Trade", &economy).await;

    let promoted = h
        .catalog
        .categories
        .update(trade.id, CategoryInput::new("Trade"))
        .await
        .unwrap();
    assert_eq!(promoted.level, ROOT_LEVEL);
    assert_eq!(promoted.parent_id, None);

    let moved = h
        .catalog
        .categories
        .update(trade.id, CategoryInput::new("Trade").with_parent(economy.id))
        .await
        .unwrap();
    assert_eq!(moved.level, SUB_LEVEL);
}

#[tokio::test]
async fn test_delete_guards() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    let trade = h.child("Trade", &economy).await;
    let publication = h.upload("Trade Balance 2020", 2020, &trade).await;

    assert!(matches!(
        h.catalog.categories.delete(economy.id).await,
        Err(Error::HasChildren(_))
    ));
    match h.catalog.categories.delete(trade.id).await {
        Err(Error::HasPublications { id, count }) => {
            assert_eq!(id, trade.id);
            assert_eq!(count, 1);
        }
        other => panic!("expected HasPublications, got {:?}", other),
    }

    h.catalog
        .publications
        .delete(publication.id, &h.admin_actor())
        .await
        .unwrap();
    h.catalog.categories.delete(trade.id).await.unwrap();
    h.catalog.categories.delete(economy.id).await.unwrap();
    assert!(matches!(
        h.catalog.categories.delete(economy.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_tree_is_ordered_with_counts() {
    let h = Harness::new();
    let social = h
        .catalog
        .categories
        .create(CategoryInput::new("Social").with_display_order(2))
        .await
        .unwrap();
    let economy = h
        .catalog
        .categories
        .create(CategoryInput::new("Economy").with_display_order(1))
        .await
        .unwrap();
    let trade = h
        .catalog
        .categories
        .create(
            CategoryInput::new("Trade")
                .with_parent(economy.id)
                .with_display_order(5),
        )
        .await
        .unwrap();
    let prices = h
        .catalog
        .categories
        .create(
            CategoryInput::new("Prices")
                .with_parent(economy.id)
                .with_display_order(5),
        )
        .await
        .unwrap();
    h.upload("Consumer Price Index", 2021, &prices).await;

    let tree = h.catalog.categories.list_tree().await.unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].category.id, economy.id);
    assert_eq!(tree[1].category.id, social.id);

    let subs: Vec<Uuid> = tree[0].sub_categories.iter().map(|c| c.id).collect();
    assert_eq!(subs, vec![prices.id, trade.id]);
    assert_eq!(tree[0].sub_categories[0].publication_count, 1);
    assert!(tree[1].sub_categories.is_empty());

    let children = h.catalog.categories.list_children(economy.id).await.unwrap();
    assert_eq!(children.len(), 2);
    assert!(matches!(
        h.catalog.categories.list_children(Uuid::now_v7()).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_all_categories_respect_level_invariants() {
    let h = Harness::new();
    let economy = h.root("Economy").await;
    let social = h.root("Social").await;
    h.child("Trade", &economy).await;
    h.child("Health", &social).await;
    let _ = h
        .catalog
        .categories
        .create(CategoryInput::new("Deep").with_parent(
            h.catalog.categories.list_children(economy.id).await.unwrap()[0].id,
        ))
        .await;

    let all = h.catalog.categories.list_all().await.unwrap();
    assert_eq!(all.len(), 4);
    for category in &all {
        assert!(category.level == ROOT_LEVEL || category.level == SUB_LEVEL);
        if let Some(parent_id) = category.parent_id {
            let parent = h.catalog.categories.get(parent_id).await.unwrap();
            assert_eq!(parent.level, ROOT_LEVEL);
        }
    }
}
