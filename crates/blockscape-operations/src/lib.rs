//! # Blockscape Operations
//!
//! Reversible, asynchronously-executed mutation of the block graph.
//!
//! ## Components
//!
//! - [`Operation`]: an atomic unit of change with `apply`/`undo`/`dispose`
//! - [`CompoundOperation`]: an ordered group of operations run as one
//!   history entry; children run strictly in order and undo in reverse
//! - [`EntityCollection`]: an insertion-ordered collection of unique
//!   entities that only operations may mutate
//! - [`AddToCollection`], [`RemoveFromCollection`], [`MovePointOperation`],
//!   [`SetParamOperation`]: the concrete mutations
//! - [`OperationManager`]: owns the undo and redo stacks and runs every
//!   request on a single worker task, one at a time, in arrival order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockscape_operations::{AddToCollection, EntityCollection, OperationManager};
//!
//! let manager = OperationManager::spawn(Default::default(), bus.clone());
//! let blocks = EntityCollection::new();
//!
//! manager.execute(AddToCollection::new(block, blocks.clone())).await?;
//! manager.undo().await?;
//! manager.redo().await?;
//! ```

pub mod collection;
pub mod collection_ops;
pub mod compound;
pub mod manager;
pub mod operation;
pub mod value_ops;

pub use collection::{Entity, EntityCollection, EntityRef};
pub use collection_ops::{AddToCollection, RemoveFromCollection};
pub use compound::CompoundOperation;
pub use manager::{HistorySnapshot, OperationInfo, OperationManager, OperationManagerConfig};
pub use operation::Operation;
pub use value_ops::{MovePointOperation, SetParamOperation};
