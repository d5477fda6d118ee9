//! Command dispatch

use blockscape_core::types::{thread_safe_rw, ThreadSafeRw};
use blockscape_core::{AppEvent, CommandError, CommandEvent, EventBus};
use serde_json::Value;
use std::sync::Arc;

use crate::command::Command;
use crate::handler::CommandHandlerFactory;
use crate::resource::{Resource, ResourceManager};

/// How to choose among several factories for the same command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactorySelection {
    /// The factory that was registered first wins.
    #[default]
    FirstRegistered,
}

impl FactorySelection {
    fn select<'a>(
        &self,
        candidates: &'a [Arc<dyn CommandHandlerFactory>],
    ) -> Option<&'a Arc<dyn CommandHandlerFactory>> {
        match self {
            FactorySelection::FirstRegistered => candidates.first(),
        }
    }
}

type Factories = ThreadSafeRw<Vec<Arc<dyn CommandHandlerFactory>>>;

/// Maps commands to handler factories and dispatches to them.
///
/// Factories are captured from the [`ResourceManager`]: those already present
/// when the manager is created, then every factory added later. Factories
/// are never unregistered.
pub struct CommandManager {
    factories: Factories,
    selection: FactorySelection,
    bus: Arc<EventBus>,
}

impl CommandManager {
    pub fn new(resources: &ResourceManager, bus: Arc<EventBus>) -> Self {
        Self::with_selection(resources, bus, FactorySelection::default())
    }

    pub fn with_selection(
        resources: &ResourceManager,
        bus: Arc<EventBus>,
        selection: FactorySelection,
    ) -> Self {
        let factories: Factories = thread_safe_rw(Vec::new());

        let sink = factories.clone();
        let events = bus.clone();
        let (_, existing) = resources
            .on_resource_added_with_snapshot(move |resource| capture(&sink, &events, resource));
        // Earlier resources go ahead of anything the listener has captured
        // meanwhile, keeping registration order.
        let earlier: Vec<Arc<dyn CommandHandlerFactory>> = existing
            .iter()
            .filter_map(|resource| match resource {
                Resource::CommandHandlerFactory(factory) => Some(factory.clone()),
                _ => None,
            })
            .collect();
        factories.write().splice(0..0, earlier.iter().cloned());
        for factory in &earlier {
            registered(&bus, factory.as_ref());
        }

        Self {
            factories,
            selection,
            bus,
        }
    }

    /// Runs `command` with a fresh handler from the selected factory.
    ///
    /// Returns `None` without error when no factory answers for the command.
    /// Otherwise returns the handler's own result; dispatch adds no timeout
    /// or retry.
    pub async fn execute_command(
        &self,
        command: Command,
        params: Value,
    ) -> Option<Result<Value, CommandError>> {
        let handler = {
            let candidates = self.factories_for(command);
            match self.selection.select(&candidates) {
                Some(factory) => factory.create(),
                None => {
                    tracing::debug!("No handler factory for {}", command);
                    self.publish(CommandEvent::Unhandled {
                        command: command.to_string(),
                    });
                    return None;
                }
            }
        };

        tracing::debug!("Dispatching {}", command);
        self.publish(CommandEvent::Dispatched {
            command: command.to_string(),
        });
        Some(handler.execute(params).await)
    }

    /// True if at least one factory answers for `command`.
    pub fn handles(&self, command: Command) -> bool {
        self.factories
            .read()
            .iter()
            .any(|factory| factory.command() == command)
    }

    /// Number of captured factories.
    pub fn factory_count(&self) -> usize {
        self.factories.read().len()
    }

    pub fn selection(&self) -> FactorySelection {
        self.selection
    }

    fn factories_for(&self, command: Command) -> Vec<Arc<dyn CommandHandlerFactory>> {
        self.factories
            .read()
            .iter()
            .filter(|factory| factory.command() == command)
            .cloned()
            .collect()
    }

    fn publish(&self, event: CommandEvent) {
        self.bus.publish(AppEvent::Command(event)).ok();
    }
}

fn capture(factories: &Factories, bus: &EventBus, resource: &Resource) {
    if let Resource::CommandHandlerFactory(factory) = resource {
        factories.write().push(factory.clone());
        registered(bus, factory.as_ref());
    }
}

fn registered(bus: &EventBus, factory: &dyn CommandHandlerFactory) {
    let command = factory.command();
    tracing::debug!("Captured handler factory {} for {}", factory.name(), command);
    bus.publish(AppEvent::Command(CommandEvent::FactoryRegistered {
        command: command.to_string(),
    }))
    .ok();
}

impl std::fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandManager")
            .field("factories", &self.factory_count())
            .field("selection", &self.selection)
            .finish()
    }
}
