use super::common::Harness;
use blockscape_core::{BlockId, OperationError, ParamError, Point, SceneError, SceneEvent};
use blockscape_scene::{Effect, ParamName, Source};

#[tokio::test]
async fn test_selection_events() {
    let h = Harness::new();
    let source = h
        .scene
        .create_modifiable_at(Source::new, Point::new(20.0, 20.0))
        .await
        .expect("source");
    let effect = h
        .scene
        .create_modifier_at(Effect::reverb, Point::new(80.0, 80.0))
        .await
        .expect("effect");
    h.take_events();

    h.scene.mouse_down(Point::new(20.0, 21.0));
    h.scene.select(effect).expect("select");
    h.scene.mouse_down(Point::new(50.0, 50.0));

    assert_eq!(
        h.take_events(),
        vec![
            SceneEvent::ModifiableSelected { id: source },
            SceneEvent::ModifierSelected { id: effect },
            SceneEvent::SelectionCleared,
        ]
    );
    assert!(matches!(
        h.scene.select(BlockId(99)),
        Err(SceneError::BlockNotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_undo_restores_order() {
    let h = Harness::new();
    let mut ids = Vec::new();
    for x in [10.0, 30.0, 50.0] {
        let id = h
            .scene
            .create_modifiable_at(Source::new, Point::new(x, 10.0))
            .await
            .expect("create");
        ids.push(id);
    }

    h.scene.select(ids[1]).expect("select");
    let info = h.scene.delete_selected().await.expect("delete");
    assert_eq!(info.name, "Remove Source");
    assert_eq!(h.scene.modifiables().ids(), vec![ids[0], ids[2]]);
    assert_eq!(h.scene.selected(), None);

    h.scene.undo().await.expect("undo");
    assert_eq!(h.scene.modifiables().ids(), ids);

    h.scene.redo().await.expect("redo");
    assert_eq!(h.scene.modifiables().ids(), vec![ids[0], ids[2]]);
}

#[tokio::test]
async fn test_undoing_a_create_drops_its_selection() {
    let h = Harness::new();
    let id = h.scene.create_modifiable(Source::new).await.expect("create");
    h.scene.select(id).expect("select");

    h.scene.undo().await.expect("undo");
    assert!(h.scene.modifiables().is_empty());
    assert_eq!(h.scene.selected(), None);
}

#[tokio::test]
async fn test_set_param_is_undoable() {
    let h = Harness::new();
    let effect = h
        .scene
        .create_modifier_at(Effect::reverb, Point::new(50.0, 50.0))
        .await
        .expect("effect");

    h.scene.set_param(effect, "roomSize", 0.9).await.expect("set");
    let value = |name| {
        h.scene
            .block(effect)
            .expect("effect")
            .param(name)
            .expect("param")
    };
    assert_eq!(value(ParamName::RoomSize), 0.9);

    h.scene.undo().await.expect("undo");
    assert_eq!(value(ParamName::RoomSize), 0.5);
}

#[tokio::test]
async fn test_set_param_rejections() {
    let h = Harness::new();
    let source = h.scene.create_modifiable(Source::new).await.expect("source");
    let effect = h.scene.create_modifier(Effect::reverb).await.expect("effect");

    assert!(matches!(
        h.scene.set_param(effect, "feedback", 0.3).await,
        Err(SceneError::Param(ParamError::UnknownParameter { .. }))
    ));
    assert!(matches!(
        h.scene.set_param(source, "mix", 0.3).await,
        Err(SceneError::Param(ParamError::UnknownParameter { .. }))
    ));
    assert!(matches!(
        h.scene.set_param(effect, "mix", 1.5).await,
        Err(SceneError::Operation(OperationError::Param(ParamError::OutOfRange { .. })))
    ));

    // Rejected changes never reach history.
    let history = h.scene.history().await.expect("history");
    assert_eq!(history.undo.len(), 2);
    assert_eq!(h.scene.params(effect).expect("params")[2].value, 0.5);
}

#[tokio::test]
async fn test_queued_moves_undo_one_step_at_a_time() {
    let h = Harness::new();
    let id = h
        .scene
        .create_modifiable_at(Source::new, Point::new(0.0, 0.0))
        .await
        .expect("create");

    let (first, second) = tokio::join!(
        h.scene.move_block(id, Point::new(10.0, 0.0)),
        h.scene.move_block(id, Point::new(20.0, 0.0)),
    );
    first.expect("first move");
    second.expect("second move");
    let position = || h.scene.block(id).expect("block").position();
    assert_eq!(position(), Point::new(20.0, 0.0));

    h.scene.undo().await.expect("undo");
    assert_eq!(position(), Point::new(10.0, 0.0));
    h.scene.undo().await.expect("undo");
    assert_eq!(position(), Point::new(0.0, 0.0));
}

#[tokio::test]
async fn test_queued_param_changes_undo_one_step_at_a_time() {
    let h = Harness::new();
    let effect = h.scene.create_modifier(Effect::reverb).await.expect("effect");

    let (first, second) = tokio::join!(
        h.scene.set_param(effect, "mix", 0.2),
        h.scene.set_param(effect, "mix", 0.9),
    );
    first.expect("first change");
    second.expect("second change");
    let mix = || {
        h.scene
            .block(effect)
            .expect("effect")
            .param(ParamName::Mix)
            .expect("mix")
    };
    assert_eq!(mix(), 0.9);

    h.scene.undo().await.expect("undo");
    assert_eq!(mix(), 0.2);
    h.scene.undo().await.expect("undo");
    assert_eq!(mix(), 0.5);
}

#[tokio::test]
async fn test_undoing_a_create_mid_drag_abandons_the_drag() {
    let h = Harness::new();
    let id = h
        .scene
        .create_modifiable_at(Source::new, Point::new(10.0, 10.0))
        .await
        .expect("create");

    assert_eq!(h.scene.mouse_down(Point::new(10.0, 10.0)), Some(id));
    h.scene.undo().await.expect("undo");
    assert!(h.scene.mouse_move(Point::new(40.0, 40.0)).is_empty());
    assert_eq!(h.scene.mouse_up(Point::new(40.0, 40.0)).await.expect("up"), None);

    // The create is still redoable.
    let history = h.scene.history().await.expect("history");
    assert!(history.undo.is_empty());
    assert_eq!(history.redo, vec!["Add Source"]);
    h.scene.redo().await.expect("redo");
    assert_eq!(h.scene.block(id).expect("restored").position(), Point::new(10.0, 10.0));
}
