//! Concrete block kinds.

pub mod effect;
pub mod source;

pub use effect::Effect;
pub use source::Source;
