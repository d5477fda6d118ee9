//! # Event Bus Module
//!
//! Publish/subscribe channel used for decoupled notification between the
//! operation manager, the command manager, the scene, and a hosting UI.
//!
//! - Publishers emit typed [`AppEvent`]s without knowing subscribers
//! - Subscribers filter by [`EventCategory`] and receive events of interest
//! - Synchronous handlers and async broadcast receivers are both supported
//!
//! ## Usage
//!
//! ```rust
//! use blockscape_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, SceneEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Scene]),
//!     |event| {
//!         if let AppEvent::Scene(scene) = event {
//!             println!("scene event: {}", scene.description());
//!         }
//!     },
//! );
//!
//! bus.publish(AppEvent::Scene(SceneEvent::SelectionCleared)).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
