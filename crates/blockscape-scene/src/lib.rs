//! # Blockscape Scene
//!
//! Spatially placed blocks whose relationships follow from proximity.
//!
//! - [`block`]: the [`Block`], [`Modifiable`] and [`Modifier`] capabilities
//! - [`blocks`]: concrete [`Source`] and [`Effect`] blocks
//! - [`params`]: typed, range-checked block parameters
//! - [`proximity`]: the attachment maintainer
//! - [`scene`]: the [`Scene`] controller (pointer input, selection,
//!   deletion, undo/redo)
//! - [`handlers`]: command handler factories bound to a scene

pub mod block;
pub mod blocks;
pub mod handlers;
pub mod params;
pub mod proximity;
pub mod scene;

pub use block::{Block, Modifiable, Modifier};
pub use blocks::{Effect, Source};
pub use handlers::{register_scene_commands, SceneCommandFactory};
pub use params::{EffectParams, ParamName, ParamRange, ParamSpec};
pub use proximity::{check_proximity, invalidate, validate_blocks, ProximityReport};
pub use scene::{BlockRef, Scene, SceneConfig};
