//! Operations that add entities to, or remove them from, a collection.

use async_trait::async_trait;
use blockscape_core::OperationError;

use crate::collection::{Entity, EntityCollection, EntityRef};
use crate::operation::Operation;

/// Appends an entity to the tail of a collection; undo removes it.
pub struct AddToCollection<T: ?Sized> {
    name: String,
    entity: EntityRef<T>,
    collection: EntityCollection<T>,
    applied: bool,
}

impl<T: ?Sized + Entity> AddToCollection<T> {
    pub fn new(entity: EntityRef<T>, collection: EntityCollection<T>) -> Self {
        let name = format!("Add {}", entity.read().id());
        Self {
            name,
            entity,
            collection,
            applied: false,
        }
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<T: ?Sized + Entity + 'static> Operation for AddToCollection<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        self.collection.push(self.entity.clone())?;
        self.applied = true;
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        if !self.applied {
            return Err(OperationError::NotApplied {
                operation: self.name.clone(),
            });
        }
        self.collection.remove(&self.entity)?;
        self.applied = false;
        Ok(())
    }

    fn dispose(&mut self) {
        // An undone add that leaves history can never bring its entity back.
        if !self.applied && !self.collection.contains(&self.entity) {
            self.entity.write().dispose();
        }
    }
}

/// Removes an entity from a collection; undo puts it back at the index it
/// occupied, not at the tail.
pub struct RemoveFromCollection<T: ?Sized> {
    name: String,
    entity: EntityRef<T>,
    collection: EntityCollection<T>,
    removed_at: Option<usize>,
}

impl<T: ?Sized + Entity> RemoveFromCollection<T> {
    pub fn new(entity: EntityRef<T>, collection: EntityCollection<T>) -> Self {
        let name = format!("Remove {}", entity.read().id());
        Self {
            name,
            entity,
            collection,
            removed_at: None,
        }
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Index the entity occupied before the last successful apply.
    pub fn removed_at(&self) -> Option<usize> {
        self.removed_at
    }
}

#[async_trait]
impl<T: ?Sized + Entity + 'static> Operation for RemoveFromCollection<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        let index = self.collection.remove(&self.entity)?;
        self.removed_at = Some(index);
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        let index = self.removed_at.ok_or_else(|| OperationError::NotApplied {
            operation: self.name.clone(),
        })?;
        self.collection.insert(index, self.entity.clone())?;
        self.removed_at = None;
        Ok(())
    }

    fn dispose(&mut self) {
        // An applied removal trimmed from history is permanent.
        if self.removed_at.is_some() && !self.collection.contains(&self.entity) {
            self.entity.write().dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::{item, Item};
    use blockscape_core::BlockId;

    fn seeded(n: u64) -> (EntityCollection<Item>, Vec<EntityRef<Item>>) {
        let collection = EntityCollection::new();
        let items: Vec<_> = (0..n).map(item).collect();
        for i in &items {
            collection.push(i.clone()).expect("push");
        }
        (collection, items)
    }

    #[tokio::test]
    async fn test_add_and_undo() {
        let collection = EntityCollection::new();
        let mut op = AddToCollection::new(item(1), collection.clone());

        op.apply().await.expect("apply");
        assert_eq!(collection.ids(), vec![BlockId(1)]);

        op.undo().await.expect("undo");
        assert!(collection.is_empty());

        op.apply().await.expect("redo");
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_fails() {
        let (collection, items) = seeded(2);
        let mut op = AddToCollection::new(items[0].clone(), collection.clone());
        assert!(matches!(
            op.apply().await,
            Err(OperationError::DuplicateEntity { .. })
        ));
        assert_eq!(collection.len(), 2);
    }

    #[tokio::test]
    async fn test_undo_before_apply_is_rejected() {
        let collection = EntityCollection::new();
        let mut op = AddToCollection::new(item(1), collection);
        assert!(matches!(
            op.undo().await,
            Err(OperationError::NotApplied { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_restores_original_index() {
        let (collection, items) = seeded(4);
        let mut op = RemoveFromCollection::new(items[1].clone(), collection.clone());

        op.apply().await.expect("apply");
        assert_eq!(op.removed_at(), Some(1));
        assert_eq!(collection.ids(), vec![BlockId(0), BlockId(2), BlockId(3)]);

        op.undo().await.expect("undo");
        assert_eq!(
            collection.ids(),
            vec![BlockId(0), BlockId(1), BlockId(2), BlockId(3)]
        );
    }

    #[tokio::test]
    async fn test_remove_missing_entity_fails_loudly() {
        let (collection, _) = seeded(1);
        let mut op = RemoveFromCollection::new(item(9), collection.clone());
        assert!(matches!(
            op.apply().await,
            Err(OperationError::EntityNotFound { id }) if id == BlockId(9)
        ));
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_dispose_only_when_entity_is_gone_for_good() {
        let collection = EntityCollection::new();
        let entity = item(1);

        let mut add = AddToCollection::new(entity.clone(), collection.clone());
        add.apply().await.expect("apply");
        add.dispose();
        assert!(!entity.read().disposed, "live entity must not be disposed");

        add.undo().await.expect("undo");
        add.dispose();
        assert!(entity.read().disposed);
    }

    #[tokio::test]
    async fn test_dispose_applied_removal() {
        let (collection, items) = seeded(2);
        let mut remove = RemoveFromCollection::new(items[0].clone(), collection.clone());

        remove.apply().await.expect("apply");
        remove.dispose();
        assert!(items[0].read().disposed);
        assert!(!items[1].read().disposed);
    }
}
