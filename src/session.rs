//! Session wiring.
//!
//! A [`Session`] owns one event bus, one scene and a command manager whose
//! handlers drive that scene.

use std::sync::Arc;

use anyhow::anyhow;
use blockscape_commands::{Command, CommandManager, ResourceManager};
use blockscape_core::{AppEvent, EventBus, EventCategory, EventFilter, SubscriptionId};
use blockscape_scene::{register_scene_commands, Scene};
use blockscape_settings::Config;
use serde_json::{json, Value};

pub struct Session {
    bus: Arc<EventBus>,
    scene: Arc<Scene>,
    resources: ResourceManager,
    commands: CommandManager,
    trace: SubscriptionId,
}

impl Session {
    /// Builds a session from `config`. Must be called from within a Tokio
    /// runtime.
    pub fn new(config: &Config) -> Self {
        let bus = Arc::new(EventBus::with_config(config.event_bus_config()));
        let trace = bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Scene, EventCategory::Command]),
            |event: AppEvent| tracing::info!("{}", event.description()),
        );

        let scene = Scene::new(
            config.scene_config(),
            config.operation_manager_config(),
            bus.clone(),
        );
        let resources = ResourceManager::new();
        let commands = CommandManager::new(&resources, bus.clone());
        register_scene_commands(&resources, &scene);

        Self {
            bus,
            scene,
            resources,
            commands,
            trace,
        }
    }

    /// Dispatches a command and fails when nothing handles it.
    pub async fn run(&self, command: Command, params: Value) -> anyhow::Result<Value> {
        match self.commands.execute_command(command, params).await {
            Some(result) => Ok(result?),
            None => Err(anyhow!("no handler registered for '{}'", command)),
        }
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    pub fn commands(&self) -> &CommandManager {
        &self.commands
    }

    /// The block graph as JSON.
    pub fn describe(&self) -> Value {
        let modifiables: Vec<Value> = self
            .scene
            .modifiables()
            .ids()
            .into_iter()
            .filter_map(|id| {
                let block = self.scene.block(id)?;
                let attached = self.scene.attached_modifiers(id).ok()?;
                Some(json!({
                    "id": id,
                    "name": block.name(),
                    "position": block.position(),
                    "modifiers": attached,
                }))
            })
            .collect();

        let modifiers: Vec<Value> = self
            .scene
            .modifiers()
            .ids()
            .into_iter()
            .filter_map(|id| {
                let block = self.scene.block(id)?;
                let params: serde_json::Map<String, Value> = block
                    .params()
                    .into_iter()
                    .map(|spec| (spec.name.to_string(), json!(spec.value)))
                    .collect();
                Some(json!({
                    "id": id,
                    "name": block.name(),
                    "position": block.position(),
                    "params": params,
                }))
            })
            .collect();

        json!({ "modifiables": modifiables, "modifiers": modifiers })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.trace);
    }
}
