//! Event type definitions for the event bus.
//!
//! Events are grouped by category. They are cloneable and serializable so a
//! host UI can log or replay them.

use serde::{Deserialize, Serialize};

use crate::geometry::BlockId;

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Operation manager lifecycle
    Operation(OperationEvent),
    /// Scene selection and proximity changes
    Scene(SceneEvent),
    /// Command dispatch
    Command(CommandEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Operation(_) => EventCategory::Operation,
            AppEvent::Scene(_) => EventCategory::Scene,
            AppEvent::Command(_) => EventCategory::Command,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Operation(e) => e.description(),
            AppEvent::Scene(e) => e.description(),
            AppEvent::Command(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Operation manager events.
    Operation,
    /// Scene events.
    Scene,
    /// Command dispatch events.
    Command,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Operation => write!(f, "Operation"),
            EventCategory::Scene => write!(f, "Scene"),
            EventCategory::Command => write!(f, "Command"),
        }
    }
}

/// Sequence number handed out by the operation manager for each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub u64);

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// Which manager entry point ran an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// First application through `execute`.
    Do,
    /// Reversal popped from the undo stack.
    Undo,
    /// Re-application popped from the redo stack.
    Redo,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Do => write!(f, "do"),
            OperationKind::Undo => write!(f, "undo"),
            OperationKind::Redo => write!(f, "redo"),
        }
    }
}

/// Operation manager events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperationEvent {
    /// An operation was accepted and queued for execution.
    Added {
        /// Request sequence number.
        id: OperationId,
        /// Operation display name.
        name: String,
    },
    /// An operation finished running, successfully or not.
    Completed {
        /// Request sequence number.
        id: OperationId,
        /// Operation display name.
        name: String,
        /// Entry point that ran it.
        kind: OperationKind,
        /// Failure message, `None` on success.
        error: Option<String>,
        /// Undo stack depth after completion.
        undo_depth: usize,
        /// Redo stack depth after completion.
        redo_depth: usize,
    },
    /// An operation left history for good and released its resources.
    Disposed {
        /// Operation display name.
        name: String,
    },
}

impl OperationEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            OperationEvent::Added { id, name } => format!("Queued {} ({})", name, id),
            OperationEvent::Completed {
                id,
                name,
                kind,
                error: None,
                ..
            } => format!("Completed {} {} ({})", kind, name, id),
            OperationEvent::Completed {
                id,
                name,
                kind,
                error: Some(err),
                ..
            } => format!("Failed {} {} ({}): {}", kind, name, id, err),
            OperationEvent::Disposed { name } => format!("Disposed {}", name),
        }
    }

    /// True for a completion that succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationEvent::Completed { error: None, .. })
    }
}

/// Why a modifier was detached from a modifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetachReason {
    /// The pair moved further apart than the catchment radius.
    OutOfRange,
    /// The modifier is no longer part of the scene.
    ModifierRemoved,
}

/// Scene events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// A modifiable block was clicked and is now selected.
    ModifiableSelected {
        /// Selected block.
        id: BlockId,
    },
    /// A modifier block was clicked and is now selected.
    ModifierSelected {
        /// Selected block.
        id: BlockId,
    },
    /// Selection was cleared.
    SelectionCleared,
    /// A modifier came within range of a modifiable.
    Attached {
        /// The affected modifiable.
        modifiable: BlockId,
        /// The modifier now influencing it.
        modifier: BlockId,
    },
    /// A modifier stopped influencing a modifiable.
    Detached {
        /// The affected modifiable.
        modifiable: BlockId,
        /// The modifier that was dropped.
        modifier: BlockId,
        /// Why it was dropped.
        reason: DetachReason,
    },
}

impl SceneEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            SceneEvent::ModifiableSelected { id } => format!("Selected modifiable {}", id),
            SceneEvent::ModifierSelected { id } => format!("Selected modifier {}", id),
            SceneEvent::SelectionCleared => "Selection cleared".to_string(),
            SceneEvent::Attached {
                modifiable,
                modifier,
            } => format!("Attached {} -> {}", modifier, modifiable),
            SceneEvent::Detached {
                modifiable,
                modifier,
                reason,
            } => format!("Detached {} -> {} ({:?})", modifier, modifiable, reason),
        }
    }
}

/// Command dispatch events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandEvent {
    /// A factory was captured from the resource registry.
    FactoryRegistered {
        /// Command the factory answers for.
        command: String,
    },
    /// A command was handed to a handler.
    Dispatched {
        /// Command name.
        command: String,
    },
    /// No factory answers for the command.
    Unhandled {
        /// Command name.
        command: String,
    },
}

impl CommandEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            CommandEvent::FactoryRegistered { command } => {
                format!("Registered handler factory for {}", command)
            }
            CommandEvent::Dispatched { command } => format!("Dispatched {}", command),
            CommandEvent::Unhandled { command } => format!("Unhandled command {}", command),
        }
    }
}
