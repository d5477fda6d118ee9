//! Type aliases for commonly used shared-state types.
//!
//! Blocks, collections and registries are shared between the scene, the
//! operation manager's worker task, and command handlers, so every shared
//! type here is thread-safe and built on `parking_lot` locks.
//!
//! ## Usage
//!
//! ```rust
//! use blockscape_core::types::*;
//!
//! let counter: ThreadSafe<u32> = thread_safe(0);
//! *counter.lock() += 1;
//!
//! let names: ThreadSafeRw<Vec<String>> = thread_safe_rw(Vec::new());
//! names.write().push("source".to_string());
//! assert_eq!(names.read().len(), 1);
//! ```

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Multiple readers can access concurrently, but writes require exclusive access.
/// `T` may be unsized, e.g. `ThreadSafeRw<dyn Modifiable>`.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
