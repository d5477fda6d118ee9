//! Command handler interfaces

use async_trait::async_trait;
use blockscape_core::CommandError;
use serde_json::Value;

use crate::command::Command;

/// Runs one command.
///
/// A handler is created fresh for each dispatch and dropped afterwards.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Executes the command. `params` is `Value::Null` when the caller
    /// supplied no parameters.
    async fn execute(&self, params: Value) -> Result<Value, CommandError>;
}

/// Produces handlers for a single command.
pub trait CommandHandlerFactory: Send + Sync {
    /// The command this factory answers for.
    fn command(&self) -> Command;

    /// Creates a new handler instance.
    fn create(&self) -> Box<dyn CommandHandler>;

    /// Name used in logs.
    fn name(&self) -> &str {
        self.command().as_str()
    }
}
