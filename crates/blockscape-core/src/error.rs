//! Error handling for Blockscape
//!
//! Provides error types for every layer of the block editor:
//! - Operation errors (do/undo failures, collection consistency violations)
//! - Command errors (handler failures during dispatch)
//! - Scene errors (selection, lookup, canvas state)
//! - Parameter errors (typed block parameters)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::geometry::BlockId;
use thiserror::Error;

/// Operation error type
///
/// Raised when an operation's `apply`/`undo` fails, or when an operation
/// would break the consistency of the collection it mutates.
#[derive(Error, Debug, Clone)]
pub enum OperationError {
    /// The operation ran and failed
    #[error("Operation '{operation}' failed: {reason}")]
    Failed {
        /// Display name of the failing operation.
        operation: String,
        /// Why it failed.
        reason: String,
    },

    /// The entity is already present in the target collection
    #[error("Entity {id} is already in the collection")]
    DuplicateEntity {
        /// Identity of the duplicated entity.
        id: BlockId,
    },

    /// The entity is not present in the target collection
    #[error("Entity {id} is not in the collection")]
    EntityNotFound {
        /// Identity of the missing entity.
        id: BlockId,
    },

    /// An insertion index lies past the end of the collection
    #[error("Index {index} out of bounds (length: {len})")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Collection length at the time of the insertion.
        len: usize,
    },

    /// Undo was requested on an operation that has not been applied
    #[error("Operation '{operation}' has not been applied")]
    NotApplied {
        /// Display name of the operation.
        operation: String,
    },

    /// A child of a compound operation failed; later children did not run
    #[error("Step {index} of compound operation failed: {source}")]
    CompoundStep {
        /// Position of the failing child in execution order.
        index: usize,
        /// The child's error.
        #[source]
        source: Box<OperationError>,
    },

    /// Children were added or removed after the compound started executing
    #[error("Compound operation '{operation}' can no longer be modified")]
    CompoundSealed {
        /// Display name of the compound.
        operation: String,
    },

    /// The operation manager worker is no longer running
    #[error("Operation manager is closed")]
    ManagerClosed,

    /// A parameter change was rejected
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Parameter error type
///
/// Block parameters are a closed set per block kind; unknown names and
/// out-of-range values are rejected instead of creating new fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    /// The block kind has no parameter with this name
    #[error("Unknown parameter '{param}' for {block}")]
    UnknownParameter {
        /// Block kind name.
        block: String,
        /// The rejected parameter name.
        param: String,
    },

    /// The value lies outside the parameter's range
    #[error("Value {value} for '{param}' is outside {min}..={max}")]
    OutOfRange {
        /// Parameter name.
        param: String,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

/// Command error type
///
/// A handler ran and failed. "No handler registered" is not an error; it
/// is reported as an empty dispatch result.
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// The handler rejected its parameters
    #[error("Invalid parameters for {command}: {reason}")]
    InvalidParameters {
        /// Command name.
        command: String,
        /// Why the parameters were rejected.
        reason: String,
    },

    /// The handler failed while executing
    #[error("Command {command} failed: {reason}")]
    Handler {
        /// Command name.
        command: String,
        /// The failure reason.
        reason: String,
    },

    /// An operation issued by the handler failed
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// The scene rejected the handler's request
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Scene error type
#[derive(Error, Debug, Clone)]
pub enum SceneError {
    /// No block with this id exists in the scene
    #[error("Block {id} not found")]
    BlockNotFound {
        /// The missing block id.
        id: BlockId,
    },

    /// The request needs a selected block
    #[error("No block selected")]
    NoSelection,

    /// Canvas dimensions must be positive and finite
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// An operation issued by the scene failed
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// A parameter change was rejected
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Main error type for Blockscape
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Operation error
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Parameter error
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an operation error
    pub fn is_operation_error(&self) -> bool {
        matches!(self, Error::Operation(_))
    }

    /// Check if this is a command error
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }

    /// Check if this is a scene error
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }

    /// Check if this error means the collections would have diverged
    /// from the undo history
    pub fn is_consistency_violation(&self) -> bool {
        let op = match self {
            Error::Operation(op) => op,
            Error::Scene(SceneError::Operation(op)) => op,
            Error::Command(CommandError::Operation(op)) => op,
            _ => return false,
        };
        op.is_consistency_violation()
    }
}

impl OperationError {
    /// Shorthand for [`OperationError::Failed`].
    pub fn failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        OperationError::Failed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by a caller mutating a collection into an
    /// impossible state (duplicate insert, removing an absent entity, bad index).
    pub fn is_consistency_violation(&self) -> bool {
        match self {
            OperationError::DuplicateEntity { .. }
            | OperationError::EntityNotFound { .. }
            | OperationError::IndexOutOfBounds { .. }
            | OperationError::NotApplied { .. } => true,
            OperationError::CompoundStep { source, .. } => source.is_consistency_violation(),
            _ => false,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
