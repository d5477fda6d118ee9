//! Insertion-ordered collections of uniquely identified entities.

use blockscape_core::types::{thread_safe_rw, ThreadSafeRw};
use blockscape_core::{BlockId, OperationError};
use parking_lot::RwLockReadGuard;
use std::sync::Arc;

/// Something that can live in an [`EntityCollection`].
pub trait Entity: Send + Sync {
    /// Stable identity of the entity.
    fn id(&self) -> BlockId;

    /// Releases resources held by the entity once it can no longer return
    /// to the scene.
    fn dispose(&mut self) {}
}

/// Shared handle to an entity. `T` is usually a trait object.
pub type EntityRef<T> = ThreadSafeRw<T>;

/// An ordered collection of unique entities.
///
/// Cloning the collection clones the handle; all clones see the same items.
/// Reads are public. Writes are crate-private so that every mutation goes
/// through an [`Operation`](crate::Operation) and therefore through history.
pub struct EntityCollection<T: ?Sized> {
    items: ThreadSafeRw<Vec<EntityRef<T>>>,
}

impl<T: ?Sized> Clone for EntityCollection<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: ?Sized + Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + Entity> EntityCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: thread_safe_rw(Vec::new()),
        }
    }

    /// Number of entities in the collection.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// True when the collection holds no entities.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// True if this exact entity handle is in the collection.
    pub fn contains(&self, entity: &EntityRef<T>) -> bool {
        self.index_of(entity).is_some()
    }

    /// True if an entity with this id is in the collection.
    pub fn contains_id(&self, id: BlockId) -> bool {
        self.items.read().iter().any(|item| item.read().id() == id)
    }

    /// Position of this exact entity handle.
    pub fn index_of(&self, entity: &EntityRef<T>) -> Option<usize> {
        self.items
            .read()
            .iter()
            .position(|item| Arc::ptr_eq(item, entity))
    }

    /// Looks up an entity by id.
    pub fn get(&self, id: BlockId) -> Option<EntityRef<T>> {
        self.items
            .read()
            .iter()
            .find(|item| item.read().id() == id)
            .cloned()
    }

    /// Entity handles in collection order.
    pub fn snapshot(&self) -> Vec<EntityRef<T>> {
        self.items.read().clone()
    }

    /// Entity ids in collection order.
    pub fn ids(&self) -> Vec<BlockId> {
        self.items.read().iter().map(|item| item.read().id()).collect()
    }

    /// Holds the collection read lock for a consistent scan.
    ///
    /// No operation can add or remove entities while the guard is alive.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<EntityRef<T>>> {
        self.items.read()
    }

    /// Appends an entity at the tail.
    pub(crate) fn push(&self, entity: EntityRef<T>) -> Result<(), OperationError> {
        self.insert_at(None, entity)
    }

    /// Inserts an entity at `index`, shifting later entities back.
    pub(crate) fn insert(&self, index: usize, entity: EntityRef<T>) -> Result<(), OperationError> {
        self.insert_at(Some(index), entity)
    }

    fn insert_at(&self, index: Option<usize>, entity: EntityRef<T>) -> Result<(), OperationError> {
        let id = entity.read().id();
        let mut items = self.items.write();
        if items
            .iter()
            .any(|item| Arc::ptr_eq(item, &entity) || item.read().id() == id)
        {
            return Err(OperationError::DuplicateEntity { id });
        }
        let index = index.unwrap_or(items.len());
        if index > items.len() {
            return Err(OperationError::IndexOutOfBounds {
                index,
                len: items.len(),
            });
        }
        items.insert(index, entity);
        Ok(())
    }

    /// Removes an entity, returning the index it occupied.
    pub(crate) fn remove(&self, entity: &EntityRef<T>) -> Result<usize, OperationError> {
        let mut items = self.items.write();
        match items.iter().position(|item| Arc::ptr_eq(item, entity)) {
            Some(index) => {
                items.remove(index);
                Ok(index)
            }
            None => Err(OperationError::EntityNotFound {
                id: entity.read().id(),
            }),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for EntityCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCollection")
            .field("len", &self.items.read().len())
            .finish()
    }
}
