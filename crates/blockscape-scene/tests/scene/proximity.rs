use super::common::Harness;
use blockscape_core::{BlockId, DetachReason, Point, SceneEvent};
use blockscape_scene::{Effect, Source};

async fn source_and_effect(h: &Harness, effect_at: Point) -> (BlockId, BlockId) {
    let source = h
        .scene
        .create_modifiable_at(Source::new, Point::new(0.0, 0.0))
        .await
        .expect("source");
    let effect = h
        .scene
        .create_modifier_at(
            |id, at| Effect::reverb(id, at).with_catchment_area(0.05),
            effect_at,
        )
        .await
        .expect("effect");
    (source, effect)
}

#[tokio::test]
async fn test_attach_and_detach_fire_once_per_transition() {
    let h = Harness::new();
    let (source, effect) = source_and_effect(&h, Point::new(10.0, 0.0)).await;

    // distance 10 > 0.05 * 100
    assert!(h.take_transitions().is_empty());
    assert!(h.scene.attached_modifiers(source).expect("source").is_empty());

    h.scene
        .move_block(effect, Point::new(3.0, 0.0))
        .await
        .expect("move in");
    assert_eq!(
        h.take_transitions(),
        vec![SceneEvent::Attached {
            modifiable: source,
            modifier: effect
        }]
    );

    h.scene
        .move_block(effect, Point::new(10.0, 0.0))
        .await
        .expect("move out");
    assert_eq!(
        h.take_transitions(),
        vec![SceneEvent::Detached {
            modifiable: source,
            modifier: effect,
            reason: DetachReason::OutOfRange
        }]
    );
}

#[tokio::test]
async fn test_rerun_without_changes_is_silent() {
    let h = Harness::new();
    source_and_effect(&h, Point::new(3.0, 0.0)).await;
    assert_eq!(h.take_transitions().len(), 1);

    assert!(h.scene.invalidate().is_empty());
    assert!(h.scene.invalidate().is_empty());
    assert!(h.take_transitions().is_empty());
}

#[tokio::test]
async fn test_drag_updates_attachment_live_and_records_one_move() {
    let h = Harness::new();
    let (source, effect) = source_and_effect(&h, Point::new(10.0, 0.0)).await;
    h.take_events();

    assert_eq!(h.scene.mouse_down(Point::new(10.0, 0.0)), Some(effect));
    let report = h.scene.mouse_move(Point::new(3.0, 0.0));
    assert_eq!(report.attached, vec![(source, effect)]);
    assert!(h.scene.mouse_move(Point::new(3.5, 0.0)).is_empty());

    let info = h
        .scene
        .mouse_up(Point::new(3.0, 0.0))
        .await
        .expect("up")
        .expect("a move was recorded");
    assert_eq!(info.name, "Move Reverb");

    let history = h.scene.history().await.expect("history");
    assert_eq!(history.undo, vec!["Add Source", "Add Reverb", "Move Reverb"]);
    assert_eq!(h.scene.attached_modifiers(source).expect("source"), vec![effect]);

    // Undo puts the effect back where the drag started.
    h.scene.undo().await.expect("undo");
    let position = h.scene.block(effect).expect("effect").position();
    assert_eq!(position, Point::new(10.0, 0.0));
    assert!(h.scene.attached_modifiers(source).expect("source").is_empty());
}

#[tokio::test]
async fn test_deleting_attached_modifier_prunes_membership() {
    let h = Harness::new();
    let (source, effect) = source_and_effect(&h, Point::new(3.0, 0.0)).await;
    assert_eq!(h.scene.attached_modifiers(source).expect("source"), vec![effect]);
    h.take_events();

    h.scene.select(effect).expect("select");
    h.scene.delete_selected().await.expect("delete");

    let events = h.take_events();
    assert!(events.contains(&SceneEvent::Detached {
        modifiable: source,
        modifier: effect,
        reason: DetachReason::ModifierRemoved
    }));
    assert!(events.contains(&SceneEvent::SelectionCleared));
    assert!(h.scene.attached_modifiers(source).expect("source").is_empty());

    // Bringing the modifier back re-attaches it by proximity.
    h.scene.undo().await.expect("undo");
    assert_eq!(h.scene.attached_modifiers(source).expect("source"), vec![effect]);
}

#[tokio::test]
async fn test_canvas_width_scales_catchment() {
    let h = Harness::new();
    let (source, effect) = source_and_effect(&h, Point::new(10.0, 0.0)).await;

    let report = h.scene.set_canvas_size(200.0, 100.0).expect("resize");
    assert_eq!(report.attached, vec![(source, effect)]);

    let report = h.scene.set_canvas_size(100.0, 100.0).expect("resize");
    assert_eq!(
        report.detached,
        vec![(source, effect, DetachReason::OutOfRange)]
    );
}
