use super::common::{block, entries, journal, manager, Step};
use blockscape_core::{BlockId, OperationError};
use blockscape_operations::{AddToCollection, CompoundOperation, EntityCollection};

#[tokio::test]
async fn test_failing_middle_child_leaves_first_applied() {
    let manager = manager();
    let log = journal();

    let compound = CompoundOperation::new("Batch")
        .with(Step::new("a", &log))
        .with(Step::new("b", &log).failing())
        .with(Step::new("c", &log));

    let err = manager.execute(compound).await.unwrap_err();
    assert!(matches!(err, OperationError::CompoundStep { index: 1, .. }));

    // a completed, b started and failed, c never started.
    assert_eq!(entries(&log), vec!["start a", "end a", "start b"]);

    let history = manager.snapshot().await.expect("snapshot");
    assert!(!history.can_undo());
}

#[tokio::test]
async fn test_compound_is_one_history_entry() {
    let manager = manager();
    let blocks = EntityCollection::new();

    let compound = CompoundOperation::new("Add Pair")
        .with(AddToCollection::new(block(1), blocks.clone()))
        .with(AddToCollection::new(block(2), blocks.clone()));
    manager.execute(compound).await.expect("execute");
    assert_eq!(blocks.ids(), vec![BlockId(1), BlockId(2)]);

    let history = manager.snapshot().await.expect("snapshot");
    assert_eq!(history.undo, vec!["Add Pair"]);

    manager.undo().await.expect("undo");
    assert!(blocks.is_empty());
    manager.redo().await.expect("redo");
    assert_eq!(blocks.ids(), vec![BlockId(1), BlockId(2)]);
}

#[tokio::test]
async fn test_delayed_children_still_run_in_order() {
    let manager = manager();
    let log = journal();

    let compound = CompoundOperation::new("Slow Batch")
        .with(Step::new("a", &log).delayed(20))
        .with(Step::new("b", &log))
        .with(Step::new("c", &log).delayed(5));
    manager.execute(compound).await.expect("execute");
    manager.undo().await.expect("undo");

    assert_eq!(
        entries(&log),
        vec![
            "start a", "end a", "start b", "end b", "start c", "end c", "undo c", "undo b",
            "undo a",
        ]
    );
}
