use super::common::Harness;
use blockscape_commands::{Command, CommandManager, ResourceManager};
use blockscape_core::{BlockId, CommandError, SceneError};
use blockscape_scene::register_scene_commands;
use serde_json::{json, Value};

fn wire(h: &Harness) -> CommandManager {
    let resources = ResourceManager::new();
    let commands = CommandManager::new(&resources, h.bus.clone());
    register_scene_commands(&resources, &h.scene);
    commands
}

#[tokio::test]
async fn test_every_command_is_handled() {
    let h = Harness::new();
    let commands = wire(&h);
    for command in Command::ALL {
        assert!(commands.handles(command), "{} has no handler", command);
    }
}

#[tokio::test]
async fn test_scripted_session() {
    let h = Harness::new();
    let commands = wire(&h);

    let created = commands
        .execute_command(Command::CreateSource, json!({"x": 0.0, "y": 0.0}))
        .await
        .expect("handled")
        .expect("create source");
    let source = BlockId(created["id"].as_u64().expect("id"));

    let created = commands
        .execute_command(
            Command::CreateEffect,
            json!({"x": 40.0, "y": 0.0, "catchmentArea": 0.05}),
        )
        .await
        .expect("handled")
        .expect("create effect");
    let effect = BlockId(created["id"].as_u64().expect("id"));

    commands
        .execute_command(Command::MoveBlock, json!({"id": effect.0, "x": 4.0, "y": 0.0}))
        .await
        .expect("handled")
        .expect("move");
    assert_eq!(h.scene.attached_modifiers(source).expect("source"), vec![effect]);

    h.scene.select(effect).expect("select");
    let result = commands
        .execute_command(Command::SetParam, json!({"param": "mix", "value": 0.25}))
        .await
        .expect("handled")
        .expect("set param");
    assert_eq!(result, json!({"name": "Set Reverb mix"}));

    let undone = commands
        .execute_command(Command::Undo, Value::Null)
        .await
        .expect("handled")
        .expect("undo");
    assert_eq!(undone, json!({"name": "Set Reverb mix"}));

    commands
        .execute_command(Command::DeleteSelected, Value::Null)
        .await
        .expect("handled")
        .expect("delete");
    assert!(h.scene.attached_modifiers(source).expect("source").is_empty());
    assert_eq!(h.scene.modifiers().len(), 0);
}

#[tokio::test]
async fn test_handler_errors_are_reported_not_swallowed() {
    let h = Harness::new();
    let commands = wire(&h);

    let err = commands
        .execute_command(Command::DeleteSelected, Value::Null)
        .await
        .expect("handled")
        .unwrap_err();
    assert!(matches!(err, CommandError::Scene(SceneError::NoSelection)));

    let err = commands
        .execute_command(Command::CreateSource, json!({"x": 1.0}))
        .await
        .expect("handled")
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidParameters { .. }));

    let err = commands
        .execute_command(Command::CreateEffect, json!({"catchmentArea": 0.0}))
        .await
        .expect("handled")
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidParameters { .. }));
}

#[tokio::test]
async fn test_undo_on_empty_history_returns_null() {
    let h = Harness::new();
    let commands = wire(&h);
    let result = commands
        .execute_command(Command::Redo, Value::Null)
        .await
        .expect("handled")
        .expect("redo");
    assert_eq!(result, Value::Null);
}
