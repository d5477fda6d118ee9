use super::common::{block, manager, TestBlock};
use blockscape_core::BlockId;
use blockscape_operations::{AddToCollection, EntityCollection, RemoveFromCollection};
use proptest::prelude::*;

/// `Some(k)` removes the `k`-th live entity (mod len); `None` adds a new one.
fn script() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0usize..8), 1..24)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn undo_all_restores_initial_order(steps in script()) {
        let (before, after_undo, after_redo, after_do) = runtime().block_on(async {
            let manager = manager();
            let blocks: EntityCollection<TestBlock> = EntityCollection::new();
            for id in 0..3 {
                manager
                    .execute(AddToCollection::new(block(id), blocks.clone()))
                    .await
                    .expect("seed");
            }
            let before = blocks.ids();

            let mut next_id = 100;
            let mut applied = 0;
            for step in &steps {
                let live = blocks.snapshot();
                match step {
                    Some(k) if !live.is_empty() => {
                        let target = live[k % live.len()].clone();
                        manager
                            .execute(RemoveFromCollection::new(target, blocks.clone()))
                            .await
                            .expect("remove");
                    }
                    _ => {
                        manager
                            .execute(AddToCollection::new(block(next_id), blocks.clone()))
                            .await
                            .expect("add");
                        next_id += 1;
                    }
                }
                applied += 1;
            }
            let after_do = blocks.ids();

            for _ in 0..applied {
                manager.undo().await.expect("undo");
            }
            let after_undo = blocks.ids();

            for _ in 0..applied {
                manager.redo().await.expect("redo");
            }
            (before, after_undo, blocks.ids(), after_do)
        });

        prop_assert_eq!(after_undo, before);
        prop_assert_eq!(after_redo, after_do);
    }

    #[test]
    fn ids_stay_unique(steps in script()) {
        let ids: Vec<BlockId> = runtime().block_on(async {
            let manager = manager();
            let blocks: EntityCollection<TestBlock> = EntityCollection::new();
            for (n, step) in steps.iter().enumerate() {
                // Re-adding an id already present must be rejected.
                let id = step.map(|k| k as u64).unwrap_or(n as u64);
                let _ = manager
                    .execute(AddToCollection::new(block(id), blocks.clone()))
                    .await;
            }
            blocks.ids()
        });

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), ids.len());
    }
}
