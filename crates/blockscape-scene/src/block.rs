//! Block capability traits.
//!
//! A block is an entity with a position on the canvas. Modifiables are
//! affected by nearby modifiers and own the list of modifiers currently
//! attached to them; modifiers only expose their influence radius and never
//! track who they affect.

use blockscape_core::{BlockId, ParamError, Point};
use blockscape_operations::Entity;

use crate::params::{ParamName, ParamSpec};

/// Anything that can be placed and picked on the canvas.
pub trait Block: Entity {
    /// Display name of the block kind.
    fn name(&self) -> &str;

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// True if `point` lies within `radius` of the block.
    fn hit_test(&self, point: Point, radius: f64) -> bool {
        self.position().distance_to(&point) <= radius
    }

    /// Current parameter values with their ranges. Empty for blocks without
    /// parameters.
    fn params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    fn param(&self, name: ParamName) -> Result<f64, ParamError> {
        Err(unknown_param(self.name(), name))
    }

    fn set_param(&mut self, name: ParamName, _value: f64) -> Result<(), ParamError> {
        Err(unknown_param(self.name(), name))
    }
}

/// A block that modifiers can attach to.
pub trait Modifiable: Block {
    /// Attached modifiers in attachment order.
    fn modifiers(&self) -> &[BlockId];

    /// Attaches a modifier. Returns false if it was already attached.
    fn add_modifier(&mut self, modifier: BlockId) -> bool;

    /// Detaches a modifier. Returns false if it was not attached.
    fn remove_modifier(&mut self, modifier: BlockId) -> bool;

    fn has_modifier(&self, modifier: BlockId) -> bool {
        self.modifiers().contains(&modifier)
    }

    /// Drops every attached modifier missing from `current`, the
    /// authoritative modifier set, and returns the dropped ids.
    fn validate_modifiers(&mut self, current: &[BlockId]) -> Vec<BlockId> {
        let stale: Vec<BlockId> = self
            .modifiers()
            .iter()
            .copied()
            .filter(|id| !current.contains(id))
            .collect();
        for id in &stale {
            self.remove_modifier(*id);
        }
        stale
    }

    /// Distance from the block's reference point to `point`.
    fn distance_from(&self, point: Point) -> f64 {
        self.position().distance_to(&point)
    }
}

/// A block that influences modifiables within its catchment radius.
pub trait Modifier: Block {
    /// Influence radius as a fraction of the canvas width.
    fn catchment_area(&self) -> f64;

    /// Influence radius in canvas units for a canvas `reference_width` wide.
    fn catchment_radius(&self, reference_width: f64) -> f64 {
        self.catchment_area() * reference_width
    }
}

pub(crate) fn unknown_param(block: &str, name: ParamName) -> ParamError {
    ParamError::UnknownParameter {
        block: block.to_string(),
        param: name.to_string(),
    }
}
