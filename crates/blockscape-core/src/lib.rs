//! # Blockscape Core
//!
//! Core types shared by every Blockscape crate:
//! block identity and geometry, the unified error type, the in-process
//! event bus, and shared-state type aliases.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod types;

pub use error::{CommandError, Error, OperationError, ParamError, Result, SceneError};

pub use event_bus::{
    AppEvent, CommandEvent, DetachReason, EventBus, EventBusConfig, EventBusError, EventCategory,
    EventFilter, OperationEvent, OperationId, OperationKind, SceneEvent, SubscriptionId,
};

pub use geometry::{BlockId, Point};

pub use types::{thread_safe, thread_safe_rw, ThreadSafe, ThreadSafeRw};
