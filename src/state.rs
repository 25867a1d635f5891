//! Shared application state: one repository per collection, fixed at startup.

use crate::record::EntityKind;
use crate::repository::Repository;
use std::sync::Arc;

/// The typed set of repositories handed to the router.
pub struct AppState<R> {
    pub fruits: Arc<R>,
    pub vegetables: Arc<R>,
    pub greens: Arc<R>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            fruits: Arc::clone(&self.fruits),
            vegetables: Arc::clone(&self.vegetables),
            greens: Arc::clone(&self.greens),
        }
    }
}

impl<R: Repository> AppState<R> {
    pub fn new(fruits: R, vegetables: R, greens: R) -> Self {
        Self {
            fruits: Arc::new(fruits),
            vegetables: Arc::new(vegetables),
            greens: Arc::new(greens),
        }
    }

    /// Build one repository per kind with `make`.
    pub fn from_fn(mut make: impl FnMut(EntityKind) -> R) -> Self {
        Self::new(
            make(EntityKind::Fruit),
            make(EntityKind::Vegetable),
            make(EntityKind::Green),
        )
    }

    pub fn repository(&self, kind: EntityKind) -> &Arc<R> {
        match kind {
            EntityKind::Fruit => &self.fruits,
            EntityKind::Vegetable => &self.vegetables,
            EntityKind::Green => &self.greens,
        }
    }

    /// Per-collection state for the routes of `kind`.
    pub fn collection(&self, kind: EntityKind) -> CollectionState<R> {
        CollectionState {
            kind,
            repo: Arc::clone(self.repository(kind)),
        }
    }
}

/// State seen by the CRUD handlers of a single collection.
pub struct CollectionState<R> {
    pub kind: EntityKind,
    pub repo: Arc<R>,
}

impl<R> Clone for CollectionState<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            repo: Arc::clone(&self.repo),
        }
    }
}
