use ulid::Ulid;

use crate::model::*;

use super::conflict::now_ms;
use super::{Engine, EngineError};

/// Every listing honors the same ordering contract: newest-starting booking
/// first, ties broken by id ascending so results are deterministic.
pub(super) fn sort_listing(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.span.start.cmp(&a.span.start).then(a.id.cmp(&b.id)));
}

impl Engine {
    /// Fetch one booking. Visible to the renter and the item's owner only.
    pub async fn booking_by_id(
        &self,
        booking_id: Ulid,
        viewer_id: Ulid,
    ) -> Result<Booking, EngineError> {
        self.require_user(viewer_id).await?;
        let booking = self
            .bookings
            .get(booking_id)
            .await
            .ok_or(EngineError::NotFound(booking_id))?;
        let item = self.require_item(booking.item_id).await?;
        if viewer_id != booking.renter_id && viewer_id != item.owner_id {
            return Err(EngineError::Forbidden(
                "only the renter or the item owner may view a booking",
            ));
        }
        Ok(booking)
    }

    /// All bookings requested by `renter_id`, narrowed by `filter`.
    pub async fn bookings_for_renter(
        &self,
        renter_id: Ulid,
        filter: StateFilter,
    ) -> Result<Vec<Booking>, EngineError> {
        self.require_user(renter_id).await?;
        let now = now_ms();
        let mut bookings: Vec<Booking> = self
            .bookings
            .for_renter(renter_id)
            .await
            .into_iter()
            .filter(|b| filter.matches(b, now))
            .collect();
        sort_listing(&mut bookings);
        Ok(bookings)
    }

    /// All bookings on items owned by `owner_id`, narrowed by `filter`.
    /// The owner's item-id set is resolved once and the bookings fetched in
    /// one batch, not one query per item.
    pub async fn bookings_for_owner(
        &self,
        owner_id: Ulid,
        filter: StateFilter,
    ) -> Result<Vec<Booking>, EngineError> {
        self.require_user(owner_id).await?;
        let item_ids: Vec<Ulid> = self
            .entities
            .items_by_owner(owner_id)
            .await
            .iter()
            .map(|i| i.id)
            .collect();
        let now = now_ms();
        let mut bookings: Vec<Booking> = self
            .bookings
            .for_items(&item_ids)
            .await
            .into_iter()
            .filter(|b| filter.matches(b, now))
            .collect();
        sort_listing(&mut bookings);
        Ok(bookings)
    }
}
