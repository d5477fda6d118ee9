//! # Blockscape Commands
//!
//! Resolves abstract commands to concrete handlers at runtime.
//!
//! Handler factories are not registered with the [`CommandManager`]
//! directly. They are added to a [`ResourceManager`] as
//! [`Resource::CommandHandlerFactory`] values; the command manager listens
//! for added resources and captures every factory it sees. Other resources
//! are ignored.
//!
//! ```rust,ignore
//! let resources = ResourceManager::new();
//! let commands = CommandManager::new(&resources, bus.clone());
//!
//! resources.add(Resource::CommandHandlerFactory(Arc::new(UndoFactory::new(scene))));
//!
//! match commands.execute_command(Command::Undo, Value::Null).await {
//!     None => println!("nobody handles undo"),
//!     Some(result) => println!("undo returned {:?}", result?),
//! }
//! ```

pub mod command;
pub mod handler;
pub mod manager;
pub mod resource;

pub use command::{Command, ParseCommandError};
pub use handler::{CommandHandler, CommandHandlerFactory};
pub use manager::{CommandManager, FactorySelection};
pub use resource::{Resource, ResourceManager, ResourceSubscription};
