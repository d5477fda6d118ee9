use blockscape_core::{BlockId, Point};
use blockscape_operations::Entity;

use crate::block::{Block, Modifiable};

/// A sound source. Effects attach to it when placed close enough.
#[derive(Debug, Clone)]
pub struct Source {
    id: BlockId,
    position: Point,
    modifiers: Vec<BlockId>,
    disposed: bool,
}

impl Source {
    pub fn new(id: BlockId, position: Point) -> Self {
        Self {
            id,
            position,
            modifiers: Vec::new(),
            disposed: false,
        }
    }

    /// True once the source has left the scene for good.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Entity for Source {
    fn id(&self) -> BlockId {
        self.id
    }

    fn dispose(&mut self) {
        tracing::trace!("Disposing source {}", self.id);
        self.modifiers.clear();
        self.disposed = true;
    }
}

impl Block for Source {
    fn name(&self) -> &str {
        "Source"
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

impl Modifiable for Source {
    fn modifiers(&self) -> &[BlockId] {
        &self.modifiers
    }

    fn add_modifier(&mut self, modifier: BlockId) -> bool {
        if self.modifiers.contains(&modifier) {
            return false;
        }
        self.modifiers.push(modifier);
        true
    }

    fn remove_modifier(&mut self, modifier: BlockId) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|id| *id != modifier);
        self.modifiers.len() != before
    }
}
