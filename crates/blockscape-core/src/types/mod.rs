//! Type system utilities and aliases.
//!
//! - [`aliases`]: Type aliases for `Arc<Mutex<T>>`, and `Arc<RwLock<T>>`.

pub mod aliases;

pub use aliases::*;
