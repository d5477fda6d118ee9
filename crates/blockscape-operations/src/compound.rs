//! Compound operations.
//!
//! A compound groups child operations into one history entry. Children run
//! one after another: child `i + 1` starts only once child `i` has finished.

use async_trait::async_trait;
use blockscape_core::OperationError;

use crate::operation::Operation;

/// An ordered list of operations applied and undone as one unit.
///
/// A failing child stops the sequence and the compound fails with
/// [`OperationError::CompoundStep`]. Children that already ran stay applied;
/// callers that need all-or-nothing behaviour must compensate themselves.
pub struct CompoundOperation {
    name: String,
    operations: Vec<Box<dyn Operation>>,
    started: bool,
}

impl CompoundOperation {
    /// Creates an empty compound.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
            started: false,
        }
    }

    /// Builder form of [`add_operation`](Self::add_operation).
    pub fn with(mut self, operation: impl Operation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    /// Appends a child. Only allowed before the first apply.
    pub fn add_operation(
        &mut self,
        operation: impl Operation + 'static,
    ) -> Result<(), OperationError> {
        self.ensure_unsealed()?;
        self.operations.push(Box::new(operation));
        Ok(())
    }

    /// Removes and returns the child at `index`. Only allowed before the
    /// first apply.
    pub fn remove_operation(
        &mut self,
        index: usize,
    ) -> Result<Box<dyn Operation>, OperationError> {
        self.ensure_unsealed()?;
        if index >= self.operations.len() {
            return Err(OperationError::IndexOutOfBounds {
                index,
                len: self.operations.len(),
            });
        }
        Ok(self.operations.remove(index))
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when the compound has no children.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn ensure_unsealed(&self) -> Result<(), OperationError> {
        if self.started {
            return Err(OperationError::CompoundSealed {
                operation: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Operation for CompoundOperation {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        self.started = true;
        for (index, operation) in self.operations.iter_mut().enumerate() {
            if let Err(e) = operation.apply().await {
                tracing::warn!(
                    "{}: step {} ({}) failed, earlier steps stay applied",
                    self.name,
                    index,
                    operation.name()
                );
                return Err(OperationError::CompoundStep {
                    index,
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        // Reverse order
        let count = self.operations.len();
        for (offset, operation) in self.operations.iter_mut().rev().enumerate() {
            if let Err(e) = operation.undo().await {
                return Err(OperationError::CompoundStep {
                    index: count - 1 - offset,
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }

    fn dispose(&mut self) {
        for operation in &mut self.operations {
            operation.dispose();
        }
    }
}
