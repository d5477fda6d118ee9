//! Resource registry
//!
//! Resources are values contributed to the editor at runtime. Listeners are
//! told about each resource as it is added.

use blockscape_core::types::{thread_safe_rw, ThreadSafeRw};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::handler::CommandHandlerFactory;

/// Something registered with the [`ResourceManager`].
///
/// The variant says what the resource is; listeners match on it instead of
/// probing the value.
#[derive(Clone)]
pub enum Resource {
    /// Produces command handlers.
    CommandHandlerFactory(Arc<dyn CommandHandlerFactory>),
    /// Opaque named data, e.g. a sample or an impulse response.
    Asset { name: String },
}

impl Resource {
    /// Short label for logs.
    pub fn label(&self) -> String {
        match self {
            Resource::CommandHandlerFactory(factory) => format!("factory:{}", factory.name()),
            Resource::Asset { name } => format!("asset:{}", name),
        }
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Handle for a resource-added subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceSubscription(Uuid);

type ResourceListener = Arc<dyn Fn(&Resource) + Send + Sync>;

/// Holds resources and notifies listeners when one is added.
#[derive(Clone)]
pub struct ResourceManager {
    resources: ThreadSafeRw<Vec<Resource>>,
    listeners: ThreadSafeRw<HashMap<ResourceSubscription, ResourceListener>>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self {
            resources: thread_safe_rw(Vec::new()),
            listeners: thread_safe_rw(HashMap::new()),
        }
    }

    /// Stores a resource and notifies every listener.
    ///
    /// Listeners run on the calling thread after the resource is stored and
    /// with no lock held.
    pub fn add(&self, resource: Resource) {
        tracing::debug!("Resource added: {}", resource.label());
        // Listeners are collected under the resource lock so that a
        // concurrent snapshot subscription sees this resource exactly once.
        let listeners: Vec<ResourceListener> = {
            let mut resources = self.resources.write();
            resources.push(resource.clone());
            self.listeners.read().values().cloned().collect()
        };
        for listener in listeners {
            listener(&resource);
        }
    }

    /// Registers a listener for future additions.
    pub fn on_resource_added<F>(&self, listener: F) -> ResourceSubscription
    where
        F: Fn(&Resource) + Send + Sync + 'static,
    {
        let id = ResourceSubscription(Uuid::new_v4());
        self.listeners.write().insert(id, Arc::new(listener));
        id
    }

    /// Registers a listener and returns the resources added before it.
    ///
    /// Every resource ends up either in the returned list or passed to the
    /// listener, never both.
    pub fn on_resource_added_with_snapshot<F>(
        &self,
        listener: F,
    ) -> (ResourceSubscription, Vec<Resource>)
    where
        F: Fn(&Resource) + Send + Sync + 'static,
    {
        let id = ResourceSubscription(Uuid::new_v4());
        let resources = self.resources.read();
        self.listeners.write().insert(id, Arc::new(listener));
        (id, resources.clone())
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ResourceSubscription) -> bool {
        self.listeners.write().remove(&id).is_some()
    }

    /// All resources in the order they were added.
    pub fn resources(&self) -> Vec<Resource> {
        self.resources.read().clone()
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("resources", &self.len())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}
