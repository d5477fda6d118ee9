//! # Blockscape
//!
//! An editable graph of spatially placed blocks. Modifier blocks attach to
//! the modifiable blocks they come close to, and every edit is an undoable
//! operation executed in order by an asynchronous operation manager.
//!
//! ## Architecture
//!
//! Blockscape is organized as a workspace with multiple crates:
//!
//! 1. **blockscape-core** - Geometry, identities, errors, event bus
//! 2. **blockscape-operations** - Undoable operations and the operation manager
//! 3. **blockscape-commands** - Resource registry and command dispatch
//! 4. **blockscape-scene** - Blocks, proximity and the scene controller
//! 5. **blockscape-settings** - Configuration files
//! 6. **blockscape** - Session wiring and the headless binary

pub mod session;

pub use session::Session;

pub use blockscape_commands::{Command, CommandManager, ResourceManager};
pub use blockscape_core::{
    AppEvent, BlockId, CommandError, DetachReason, Error, EventBus, EventBusConfig,
    OperationError, ParamError, Point, Result, SceneError, SceneEvent,
};
pub use blockscape_operations::{HistorySnapshot, OperationManager, OperationManagerConfig};
pub use blockscape_scene::{Effect, EffectParams, ParamName, Scene, SceneConfig, Source};
pub use blockscape_settings::{default_config_path, Config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
