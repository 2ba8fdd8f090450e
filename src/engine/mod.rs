mod aggregate;
mod classifier;
mod conflict;
mod error;
mod lifecycle;
mod store;

pub use aggregate::{last_booking, next_booking};
pub use error::EngineError;
pub use store::{BookingStore, CommentStore, EntityStore, InMemoryStore};

use std::sync::Arc;

use ulid::Ulid;

use crate::model::{Item, User};

/// Facade over the collaborator stores. The engine holds no cache or
/// mutable state of its own — every operation re-reads the backing stores,
/// so many engines (or many tasks sharing one) always observe committed
/// state.
#[derive(Clone)]
pub struct Engine {
    pub(super) entities: Arc<dyn EntityStore>,
    pub(super) bookings: Arc<dyn BookingStore>,
    pub(super) comments: Arc<dyn CommentStore>,
}

impl Engine {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        bookings: Arc<dyn BookingStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            entities,
            bookings,
            comments,
        }
    }

    /// Engine backed by a single in-memory store — the default for tests
    /// and single-process deployments. The store handle is returned too so
    /// callers can seed users and items.
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (
            Self::new(store.clone(), store.clone(), store.clone()),
            store,
        )
    }

    pub(super) async fn require_user(&self, id: Ulid) -> Result<User, EngineError> {
        self.entities
            .get_user(id)
            .await
            .ok_or(EngineError::NotFound(id))
    }

    pub(super) async fn require_item(&self, id: Ulid) -> Result<Item, EngineError> {
        self.entities
            .get_item(id)
            .await
            .ok_or(EngineError::NotFound(id))
    }
}
