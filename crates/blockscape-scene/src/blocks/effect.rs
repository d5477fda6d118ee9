use blockscape_core::{BlockId, ParamError, Point};
use blockscape_operations::Entity;

use crate::block::{Block, Modifier};
use crate::params::{EffectParams, ParamName, ParamSpec};

/// Catchment area used when none is given.
pub const DEFAULT_CATCHMENT_AREA: f64 = 0.1;

/// An effect block. It modifies every source within its catchment radius.
#[derive(Debug, Clone)]
pub struct Effect {
    id: BlockId,
    position: Point,
    catchment_area: f64,
    params: EffectParams,
    disposed: bool,
}

impl Effect {
    pub fn new(id: BlockId, position: Point, params: EffectParams) -> Self {
        Self {
            id,
            position,
            catchment_area: DEFAULT_CATCHMENT_AREA,
            params,
            disposed: false,
        }
    }

    /// A reverb with default settings.
    pub fn reverb(id: BlockId, position: Point) -> Self {
        Self::new(id, position, EffectParams::reverb())
    }

    pub fn with_catchment_area(mut self, catchment_area: f64) -> Self {
        self.catchment_area = catchment_area;
        self
    }

    pub fn effect_params(&self) -> &EffectParams {
        &self.params
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Entity for Effect {
    fn id(&self) -> BlockId {
        self.id
    }

    fn dispose(&mut self) {
        tracing::trace!("Disposing {} {}", self.params.kind_name(), self.id);
        self.disposed = true;
    }
}

impl Block for Effect {
    fn name(&self) -> &str {
        self.params.kind_name()
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn params(&self) -> Vec<ParamSpec> {
        self.params.specs()
    }

    fn param(&self, name: ParamName) -> Result<f64, ParamError> {
        self.params.get(name)
    }

    fn set_param(&mut self, name: ParamName, value: f64) -> Result<(), ParamError> {
        self.params.set(name, value)
    }
}

impl Modifier for Effect {
    fn catchment_area(&self) -> f64 {
        self.catchment_area
    }
}
