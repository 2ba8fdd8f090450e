use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::*;

/// Users and items as the engine sees them. Their CRUD lives outside the
/// core; the engine only ever resolves and filters them.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_user(&self, id: Ulid) -> Option<User>;
    async fn get_item(&self, id: Ulid) -> Option<Item>;
    async fn items_by_owner(&self, owner_id: Ulid) -> Vec<Item>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn save(&self, booking: Booking);
    async fn get(&self, id: Ulid) -> Option<Booking>;
    /// Compare-and-set status transition: updates only if the current
    /// status equals `expected`, atomically with the check. Returns the
    /// updated booking, or `None` when the booking is missing or its
    /// status has already moved on.
    async fn update_status(
        &self,
        id: Ulid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Option<Booking>;
    async fn for_renter(&self, renter_id: Ulid) -> Vec<Booking>;
    async fn for_item(&self, item_id: Ulid) -> Vec<Booking>;
    /// One batched fetch for a whole item-id set.
    async fn for_items(&self, item_ids: &[Ulid]) -> Vec<Booking>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn save(&self, comment: Comment);
    async fn for_item(&self, item_id: Ulid) -> Vec<Comment>;
    async fn for_items(&self, item_ids: &[Ulid]) -> Vec<Comment>;
}

/// DashMap-backed implementation of all three stores, with secondary
/// indexes so listings never scan the full booking table.
pub struct InMemoryStore {
    users: DashMap<Ulid, User>,
    items: DashMap<Ulid, Item>,
    bookings: DashMap<Ulid, Booking>,
    comments: DashMap<Ulid, Comment>,
    /// renter id → booking ids
    bookings_by_renter: DashMap<Ulid, Vec<Ulid>>,
    /// item id → booking ids
    bookings_by_item: DashMap<Ulid, Vec<Ulid>>,
    /// owner id → item ids
    items_by_owner: DashMap<Ulid, Vec<Ulid>>,
    /// item id → comment ids
    comments_by_item: DashMap<Ulid, Vec<Ulid>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            items: DashMap::new(),
            bookings: DashMap::new(),
            comments: DashMap::new(),
            bookings_by_renter: DashMap::new(),
            bookings_by_item: DashMap::new(),
            items_by_owner: DashMap::new(),
            comments_by_item: DashMap::new(),
        }
    }

    // ── Seeding (user/item CRUD proper lives outside the core) ──

    pub fn add_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn add_item(&self, item: Item) {
        self.items_by_owner
            .entry(item.owner_id)
            .or_default()
            .push(item.id);
        self.items.insert(item.id, item);
    }

    fn collect_bookings(&self, ids: &[Ulid]) -> Vec<Booking> {
        ids.iter()
            .filter_map(|id| self.bookings.get(id).map(|e| e.value().clone()))
            .collect()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn get_user(&self, id: Ulid) -> Option<User> {
        self.users.get(&id).map(|e| e.value().clone())
    }

    async fn get_item(&self, id: Ulid) -> Option<Item> {
        self.items.get(&id).map(|e| e.value().clone())
    }

    async fn items_by_owner(&self, owner_id: Ulid) -> Vec<Item> {
        let ids = self
            .items_by_owner
            .get(&owner_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        ids.iter()
            .filter_map(|id| self.items.get(id).map(|e| e.value().clone()))
            .collect()
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn save(&self, booking: Booking) {
        self.bookings_by_renter
            .entry(booking.renter_id)
            .or_default()
            .push(booking.id);
        self.bookings_by_item
            .entry(booking.item_id)
            .or_default()
            .push(booking.id);
        self.bookings.insert(booking.id, booking);
    }

    async fn get(&self, id: Ulid) -> Option<Booking> {
        self.bookings.get(&id).map(|e| e.value().clone())
    }

    async fn update_status(
        &self,
        id: Ulid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Option<Booking> {
        // The entry guard is exclusive, so check-then-set cannot interleave
        // with another writer on the same booking.
        let mut entry = self.bookings.get_mut(&id)?;
        if entry.status != expected {
            return None;
        }
        entry.status = next;
        Some(entry.clone())
    }

    async fn for_renter(&self, renter_id: Ulid) -> Vec<Booking> {
        let ids = self
            .bookings_by_renter
            .get(&renter_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        self.collect_bookings(&ids)
    }

    async fn for_item(&self, item_id: Ulid) -> Vec<Booking> {
        let ids = self
            .bookings_by_item
            .get(&item_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        self.collect_bookings(&ids)
    }

    async fn for_items(&self, item_ids: &[Ulid]) -> Vec<Booking> {
        let mut out = Vec::new();
        for item_id in item_ids {
            if let Some(ids) = self.bookings_by_item.get(item_id) {
                let ids = ids.value().clone();
                out.extend(self.collect_bookings(&ids));
            }
        }
        out
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn save(&self, comment: Comment) {
        self.comments_by_item
            .entry(comment.item_id)
            .or_default()
            .push(comment.id);
        self.comments.insert(comment.id, comment);
    }

    async fn for_item(&self, item_id: Ulid) -> Vec<Comment> {
        let ids = self
            .comments_by_item
            .get(&item_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        ids.iter()
            .filter_map(|id| self.comments.get(id).map(|e| e.value().clone()))
            .collect()
    }

    async fn for_items(&self, item_ids: &[Ulid]) -> Vec<Comment> {
        let mut out = Vec::new();
        for item_id in item_ids {
            out.extend(CommentStore::for_item(self, *item_id).await);
        }
        out
    }
}
