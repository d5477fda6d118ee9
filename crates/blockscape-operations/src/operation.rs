use async_trait::async_trait;
use blockscape_core::OperationError;

/// A reversible unit of change.
///
/// An operation captures the entity, collection or value it affects when it
/// is constructed. The operation manager calls [`apply`](Operation::apply)
/// once, then alternates [`undo`](Operation::undo) and `apply` as the user
/// walks history. Each call must leave the observable state exactly as it was
/// before the matching opposite call, including collection order.
#[async_trait]
pub trait Operation: Send {
    /// Returns the name of the operation for display.
    fn name(&self) -> &str;

    /// Applies the change.
    async fn apply(&mut self) -> Result<(), OperationError>;

    /// Reverses a successful [`apply`](Operation::apply).
    async fn undo(&mut self) -> Result<(), OperationError>;

    /// Releases resources held on behalf of the affected entity.
    ///
    /// Called exactly once, when the operation leaves both history stacks
    /// for good (redo branch discarded, undo history trimmed, manager cleared).
    fn dispose(&mut self) {}
}

#[async_trait]
impl<O: Operation + ?Sized> Operation for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        (**self).apply().await
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        (**self).undo().await
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}
