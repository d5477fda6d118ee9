//! Command handlers bound to a scene.
//!
//! [`register_scene_commands`] adds one factory per [`Command`] to a
//! resource manager, so a command manager listening on it can drive the
//! scene end-to-end.
//!
//! Parameters are JSON objects; every field is optional unless noted.
//!
//! | Command | Parameters | Result |
//! |---|---|---|
//! | `create-source` | `x`, `y` | `{"id"}` |
//! | `create-effect` | `x`, `y`, `catchmentArea` | `{"id"}` |
//! | `delete-selected` | | `{"name"}` |
//! | `undo`, `redo` | | `{"name"}` or `null` |
//! | `set-param` | `id`, `param` (required), `value` (required) | `{"name"}` |
//! | `move-block` | `id`, `x` (required), `y` (required) | `{"name"}` |
//!
//! Where `id` is omitted the selected block is used.

use async_trait::async_trait;
use blockscape_commands::{Command, CommandHandler, CommandHandlerFactory, Resource, ResourceManager};
use blockscape_core::{BlockId, CommandError, Point, SceneError};
use blockscape_operations::OperationInfo;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::blocks::{Effect, Source};
use crate::scene::Scene;

/// Adds a factory for every command to `resources`.
pub fn register_scene_commands(resources: &ResourceManager, scene: &Arc<Scene>) {
    for command in Command::ALL {
        let factory = SceneCommandFactory::new(command, scene.clone());
        resources.add(Resource::CommandHandlerFactory(Arc::new(factory)));
    }
}

/// Produces handlers for one command against a shared scene.
pub struct SceneCommandFactory {
    command: Command,
    scene: Arc<Scene>,
}

impl SceneCommandFactory {
    pub fn new(command: Command, scene: Arc<Scene>) -> Self {
        Self { command, scene }
    }
}

impl CommandHandlerFactory for SceneCommandFactory {
    fn command(&self) -> Command {
        self.command
    }

    fn create(&self) -> Box<dyn CommandHandler> {
        Box::new(SceneCommandHandler {
            command: self.command,
            scene: self.scene.clone(),
        })
    }
}

struct SceneCommandHandler {
    command: Command,
    scene: Arc<Scene>,
}

#[derive(Debug, Deserialize)]
struct Placement {
    x: Option<f64>,
    y: Option<f64>,
    #[serde(rename = "catchmentArea")]
    catchment_area: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SetParamParams {
    id: Option<u64>,
    param: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct MoveParams {
    id: Option<u64>,
    x: f64,
    y: f64,
}

#[async_trait]
impl CommandHandler for SceneCommandHandler {
    async fn execute(&self, params: Value) -> Result<Value, CommandError> {
        let scene = &self.scene;
        match self.command {
            Command::CreateSource => {
                let placement: Placement = self.parse(params)?;
                let id = match self.position(&placement)? {
                    Some(at) => scene.create_modifiable_at(Source::new, at).await?,
                    None => scene.create_modifiable(Source::new).await?,
                };
                Ok(json!({ "id": id.0 }))
            }
            Command::CreateEffect => {
                let placement: Placement = self.parse(params)?;
                let area = placement
                    .catchment_area
                    .unwrap_or_else(|| scene.config().default_catchment_area);
                if !(area > 0.0 && area <= 1.0) {
                    return Err(self.invalid(format!("catchmentArea {} is outside (0, 1]", area)));
                }
                let build = move |id, at| Effect::reverb(id, at).with_catchment_area(area);
                let id = match self.position(&placement)? {
                    Some(at) => scene.create_modifier_at(build, at).await?,
                    None => scene.create_modifier(build).await?,
                };
                Ok(json!({ "id": id.0 }))
            }
            Command::DeleteSelected => {
                let info = scene.delete_selected().await?;
                Ok(named(Some(info)))
            }
            Command::Undo => Ok(named(scene.undo().await?)),
            Command::Redo => Ok(named(scene.redo().await?)),
            Command::SetParam => {
                let p: SetParamParams = self.parse(params)?;
                let id = self.target(p.id)?;
                let info = scene.set_param(id, &p.param, p.value).await?;
                Ok(named(Some(info)))
            }
            Command::MoveBlock => {
                let p: MoveParams = self.parse(params)?;
                let id = self.target(p.id)?;
                let info = scene.move_block(id, Point::new(p.x, p.y)).await?;
                Ok(named(Some(info)))
            }
        }
    }
}

impl SceneCommandHandler {
    fn parse<T: DeserializeOwned>(&self, params: Value) -> Result<T, CommandError> {
        let params = if params.is_null() { json!({}) } else { params };
        serde_json::from_value(params).map_err(|e| self.invalid(e.to_string()))
    }

    fn invalid(&self, reason: String) -> CommandError {
        CommandError::InvalidParameters {
            command: self.command.to_string(),
            reason,
        }
    }

    fn position(&self, placement: &Placement) -> Result<Option<Point>, CommandError> {
        match (placement.x, placement.y) {
            (Some(x), Some(y)) => Ok(Some(Point::new(x, y))),
            (None, None) => Ok(None),
            _ => Err(self.invalid("x and y must be given together".to_string())),
        }
    }

    /// Explicit id, or the selected block.
    fn target(&self, id: Option<u64>) -> Result<BlockId, CommandError> {
        match id {
            Some(id) => Ok(BlockId(id)),
            None => Ok(self.scene.selected().ok_or(SceneError::NoSelection)?),
        }
    }
}

fn named(info: Option<OperationInfo>) -> Value {
    match info {
        Some(info) => json!({ "name": info.name }),
        None => Value::Null,
    }
}
