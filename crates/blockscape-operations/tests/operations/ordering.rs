use super::common::{entries, journal, manager, Step};
use blockscape_core::{AppEvent, EventBus, EventCategory, EventFilter, OperationEvent};
use blockscape_operations::{OperationManager, OperationManagerConfig};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_requests_run_fifo_without_interleaving() {
    let manager = manager();
    let log = journal();

    // Queue everything before awaiting anything.
    let slow = manager.execute(Step::new("slow", &log).delayed(30));
    let fast = manager.execute(Step::new("fast", &log).delayed(1));
    let undo = manager.undo();
    let last = manager.execute(Step::new("last", &log));

    let (slow, fast, undo, last) = tokio::join!(slow, fast, undo, last);
    slow.expect("slow");
    fast.expect("fast");
    assert_eq!(undo.expect("undo").map(|info| info.name), Some("fast".to_string()));
    last.expect("last");

    assert_eq!(
        entries(&log),
        vec![
            "start slow",
            "end slow",
            "start fast",
            "end fast",
            "undo fast",
            "start last",
            "end last",
        ]
    );
}

#[tokio::test]
async fn test_failure_releases_the_queue() {
    let manager = manager();
    let log = journal();

    let failing = manager.execute(Step::new("broken", &log).delayed(5).failing());
    let next = manager.execute(Step::new("next", &log));

    assert!(failing.await.is_err());
    next.await.expect("next runs after the failure");

    let history = manager.snapshot().await.expect("snapshot");
    assert_eq!(history.undo, vec!["next"]);
}

#[tokio::test]
async fn test_added_precedes_completed_for_every_request() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Operation]),
        move |event| {
            if let AppEvent::Operation(e) = event {
                let tag = match e {
                    OperationEvent::Added { name, .. } => format!("added {}", name),
                    OperationEvent::Completed { name, .. } => format!("completed {}", name),
                    OperationEvent::Disposed { name } => format!("disposed {}", name),
                };
                sink.lock().unwrap().push(tag);
            }
        },
    );

    let manager = OperationManager::spawn(OperationManagerConfig::default(), bus);
    let log = journal();
    let a = manager.execute(Step::new("a", &log).delayed(10));
    let b = manager.execute(Step::new("b", &log));
    let (a, b) = tokio::join!(a, b);
    a.expect("a");
    b.expect("b");

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["added a", "added b", "completed a", "completed b"]
    );
}

#[tokio::test]
async fn test_dropping_manager_disposes_history() {
    let manager = manager();
    let blocks = blockscape_operations::EntityCollection::new();
    let entity = super::common::block(9);

    manager
        .execute(blockscape_operations::AddToCollection::new(
            entity.clone(),
            blocks.clone(),
        ))
        .await
        .expect("add");
    manager.undo().await.expect("undo");
    drop(manager);

    // Give the worker a chance to drain and exit.
    for _ in 0..10 {
        if entity.read().disposed {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(entity.read().disposed);
}
