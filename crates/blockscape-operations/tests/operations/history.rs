use super::common::{block, manager, TestBlock};
use blockscape_core::BlockId;
use blockscape_operations::{AddToCollection, EntityCollection, RemoveFromCollection};

#[tokio::test]
async fn test_undo_everything_restores_initial_state() {
    let manager = manager();
    let blocks: EntityCollection<TestBlock> = EntityCollection::new();

    for id in 1..=4 {
        manager
            .execute(AddToCollection::new(block(id), blocks.clone()))
            .await
            .expect("execute");
    }
    assert_eq!(blocks.len(), 4);

    for _ in 0..4 {
        assert!(manager.undo().await.expect("undo").is_some());
    }
    assert!(blocks.is_empty());
}

#[tokio::test]
async fn test_redo_reproduces_post_do_state() {
    let manager = manager();
    let blocks = EntityCollection::new();
    let kept = block(1);
    let removed = block(2);

    manager
        .execute(AddToCollection::new(kept.clone(), blocks.clone()))
        .await
        .expect("add 1");
    manager
        .execute(AddToCollection::new(removed.clone(), blocks.clone()))
        .await
        .expect("add 2");
    manager
        .execute(RemoveFromCollection::new(kept, blocks.clone()))
        .await
        .expect("remove 1");
    let after_do = blocks.ids();

    manager.undo().await.expect("undo");
    manager.redo().await.expect("redo");
    assert_eq!(blocks.ids(), after_do);
}

#[tokio::test]
async fn test_new_execute_discards_redo_branch() {
    let manager = manager();
    let blocks = EntityCollection::new();
    let abandoned = block(1);

    manager
        .execute(AddToCollection::new(abandoned.clone(), blocks.clone()))
        .await
        .expect("add");
    manager.undo().await.expect("undo");
    manager
        .execute(AddToCollection::new(block(2), blocks.clone()))
        .await
        .expect("add");

    assert_eq!(manager.redo().await.expect("redo"), None);
    assert_eq!(blocks.ids(), vec![BlockId(2)]);
    // The discarded add can never come back, so its block was released.
    assert!(abandoned.read().disposed);
}

#[tokio::test]
async fn test_remove_undo_restores_index_not_tail() {
    let manager = manager();
    let blocks = EntityCollection::new();
    let middle = block(2);

    for entity in [block(1), middle.clone(), block(3)] {
        manager
            .execute(AddToCollection::new(entity, blocks.clone()))
            .await
            .expect("add");
    }
    manager
        .execute(RemoveFromCollection::new(middle, blocks.clone()))
        .await
        .expect("remove");
    assert_eq!(blocks.ids(), vec![BlockId(1), BlockId(3)]);

    manager.undo().await.expect("undo");
    assert_eq!(blocks.ids(), vec![BlockId(1), BlockId(2), BlockId(3)]);
}

#[tokio::test]
async fn test_removing_absent_entity_is_an_error() {
    let manager = manager();
    let blocks: EntityCollection<TestBlock> = EntityCollection::new();

    let err = manager
        .execute(RemoveFromCollection::new(block(7), blocks.clone()))
        .await
        .unwrap_err();
    assert!(err.is_consistency_violation());

    let history = manager.snapshot().await.expect("snapshot");
    assert!(!history.can_undo());
}
