use metrics::counter;
use tracing::info;
use ulid::Ulid;

use crate::limits::MAX_COMMENT_LEN;
use crate::model::*;
use crate::observability;

use super::conflict::{check_no_overlap, now_ms, validate_range};
use super::{Engine, EngineError};

impl Engine {
    /// Create a booking request for an item. The booking starts out
    /// `Waiting`; only the item's owner can move it on from there.
    ///
    /// A range overlapping an existing approved booking on the same item is
    /// rejected outright. Overlapping waiting requests are accepted — the
    /// owner arbitrates between them at decision time.
    pub async fn create_booking(
        &self,
        item_id: Ulid,
        renter_id: Ulid,
        start: Ms,
        end: Ms,
    ) -> Result<Booking, EngineError> {
        let span = validate_range(start, end)?;
        let renter = self.require_user(renter_id).await?;
        let item = self.require_item(item_id).await?;
        if !item.available {
            return Err(EngineError::InvalidState("item is not available for booking"));
        }
        if item.owner_id == renter_id {
            return Err(EngineError::Forbidden("owners cannot book their own items"));
        }

        let existing = self.bookings.for_item(item_id).await;
        if let Err(e) = check_no_overlap(&existing, &span) {
            counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        let booking = Booking {
            id: Ulid::new(),
            item_id,
            renter_id,
            span,
            status: BookingStatus::Waiting,
        };
        self.bookings.save(booking.clone()).await;
        info!(booking = %booking.id, item = %item_id, renter = %renter.id, "booking created");
        counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        Ok(booking)
    }

    /// Approve or reject a waiting booking. Only the owner of the booked
    /// item may decide, and a booking is decided exactly once: the status
    /// check and the transition are one atomic compare-and-set in the
    /// store, so concurrent decisions on the same booking cannot both land.
    pub async fn decide_booking(
        &self,
        booking_id: Ulid,
        acting_user_id: Ulid,
        approve: bool,
    ) -> Result<Booking, EngineError> {
        let booking = self
            .bookings
            .get(booking_id)
            .await
            .ok_or(EngineError::NotFound(booking_id))?;
        let item = self.require_item(booking.item_id).await?;
        if item.owner_id != acting_user_id {
            return Err(EngineError::Forbidden("only the item owner may decide a booking"));
        }

        if approve {
            // Waiting requests may overlap each other, so an approval must
            // re-check against bookings approved since this one was created.
            let existing = self.bookings.for_item(booking.item_id).await;
            let others: Vec<Booking> = existing
                .into_iter()
                .filter(|b| b.id != booking_id)
                .collect();
            if let Err(e) = check_no_overlap(&others, &booking.span) {
                counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
                return Err(e);
            }
        }

        let next = if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        let updated = self
            .bookings
            .update_status(booking_id, BookingStatus::Waiting, next)
            .await
            .ok_or(EngineError::InvalidState("booking already approved or rejected"))?;

        info!(booking = %booking_id, actor = %acting_user_id, status = ?updated.status, "booking decided");
        let decision = if approve { "approved" } else { "rejected" };
        counter!(observability::BOOKING_DECISIONS_TOTAL, "decision" => decision).increment(1);
        Ok(updated)
    }

    /// A renter may comment on an item once a booking of theirs on that
    /// item has been approved and has ended.
    pub async fn add_comment(
        &self,
        item_id: Ulid,
        author_id: Ulid,
        text: String,
    ) -> Result<Comment, EngineError> {
        if text.len() > MAX_COMMENT_LEN {
            return Err(EngineError::LimitExceeded("comment too long"));
        }
        self.require_user(author_id).await?;
        self.require_item(item_id).await?;

        let now = now_ms();
        let qualifies = self.bookings.for_item(item_id).await.iter().any(|b| {
            b.renter_id == author_id && b.status == BookingStatus::Approved && b.span.end < now
        });
        if !qualifies {
            return Err(EngineError::InvalidState(
                "no completed approved booking on this item",
            ));
        }

        let comment = Comment {
            id: Ulid::new(),
            item_id,
            author_id,
            text,
            created: now,
        };
        self.comments.save(comment.clone()).await;
        info!(comment = %comment.id, item = %item_id, author = %author_id, "comment added");
        counter!(observability::COMMENTS_CREATED_TOTAL).increment(1);
        Ok(comment)
    }
}
