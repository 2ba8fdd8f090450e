use std::collections::HashMap;

use ulid::Ulid;

use crate::model::*;

use super::conflict::now_ms;
use super::{Engine, EngineError};

// ── Last/next selection ──────────────────────────────────

/// The approved booking that most recently finished: maximum `end` among
/// approved bookings with `end < now`. Ties go to the smaller id.
pub fn last_booking(bookings: &[Booking], now: Ms) -> Option<Booking> {
    bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Approved && b.span.end < now)
        .max_by(|a, b| a.span.end.cmp(&b.span.end).then(b.id.cmp(&a.id)))
        .cloned()
}

/// The next approved booking to start: minimum `start` among approved
/// bookings with `start > now`. Ties go to the smaller id.
pub fn next_booking(bookings: &[Booking], now: Ms) -> Option<Booking> {
    bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Approved && b.span.start > now)
        .min_by(|a, b| a.span.start.cmp(&b.span.start).then(a.id.cmp(&b.id)))
        .cloned()
}

/// Comments render newest first.
fn sort_comments(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.created.cmp(&a.created).then(a.id.cmp(&b.id)));
}

/// Last/next are owner-only; everyone sees comments.
fn assemble_view(
    item: Item,
    bookings: &[Booking],
    mut comments: Vec<Comment>,
    viewer_id: Ulid,
    now: Ms,
) -> ItemView {
    let is_owner = viewer_id == item.owner_id;
    sort_comments(&mut comments);
    ItemView {
        last_booking: if is_owner { last_booking(bookings, now) } else { None },
        next_booking: if is_owner { next_booking(bookings, now) } else { None },
        comments,
        item,
    }
}

impl Engine {
    /// Render a single item for a viewer.
    pub async fn item_view(&self, item_id: Ulid, viewer_id: Ulid) -> Result<ItemView, EngineError> {
        self.require_user(viewer_id).await?;
        let item = self.require_item(item_id).await?;
        let bookings = self.bookings.for_item(item_id).await;
        let comments = self.comments.for_item(item_id).await;
        Ok(assemble_view(item, &bookings, comments, viewer_id, now_ms()))
    }

    /// Render all of an owner's items. Bookings and comments are fetched in
    /// one batch over the whole item-id set and grouped in memory — an
    /// owner with many items costs two store reads, not two per item.
    pub async fn items_for_owner(&self, owner_id: Ulid) -> Result<Vec<ItemView>, EngineError> {
        self.require_user(owner_id).await?;
        let items = self.entities.items_by_owner(owner_id).await;
        let item_ids: Vec<Ulid> = items.iter().map(|i| i.id).collect();

        let mut bookings_by_item: HashMap<Ulid, Vec<Booking>> = HashMap::new();
        for booking in self.bookings.for_items(&item_ids).await {
            bookings_by_item
                .entry(booking.item_id)
                .or_default()
                .push(booking);
        }
        let mut comments_by_item: HashMap<Ulid, Vec<Comment>> = HashMap::new();
        for comment in self.comments.for_items(&item_ids).await {
            comments_by_item
                .entry(comment.item_id)
                .or_default()
                .push(comment);
        }

        let now = now_ms();
        Ok(items
            .into_iter()
            .map(|item| {
                let bookings = bookings_by_item.remove(&item.id).unwrap_or_default();
                let comments = comments_by_item.remove(&item.id).unwrap_or_default();
                assemble_view(item, &bookings, comments, owner_id, now)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: Ms = 3_600_000;

    fn booking(start: Ms, end: Ms, status: BookingStatus) -> Booking {
        Booking {
            id: Ulid::new(),
            item_id: Ulid::new(),
            renter_id: Ulid::new(),
            span: Span::new(start, end),
            status,
        }
    }

    #[test]
    fn last_booking_picks_latest_ended() {
        let now = 100 * H;
        let early = booking(10 * H, 20 * H, BookingStatus::Approved);
        let late = booking(30 * H, 40 * H, BookingStatus::Approved);
        let all = vec![early, late.clone()];
        assert_eq!(last_booking(&all, now), Some(late));
    }

    #[test]
    fn last_booking_ignores_non_approved_and_unfinished() {
        let now = 100 * H;
        let waiting = booking(10 * H, 20 * H, BookingStatus::Waiting);
        let rejected = booking(30 * H, 40 * H, BookingStatus::Rejected);
        let running = booking(90 * H, 110 * H, BookingStatus::Approved);
        assert_eq!(last_booking(&[waiting, rejected, running], now), None);
    }

    #[test]
    fn last_booking_excludes_end_exactly_now() {
        let now = 100 * H;
        let just_ended = booking(90 * H, now, BookingStatus::Approved);
        assert_eq!(last_booking(&[just_ended], now), None);
    }

    #[test]
    fn next_booking_picks_earliest_upcoming() {
        let now = 100 * H;
        let soon = booking(110 * H, 120 * H, BookingStatus::Approved);
        let later = booking(130 * H, 140 * H, BookingStatus::Approved);
        let all = vec![later, soon.clone()];
        assert_eq!(next_booking(&all, now), Some(soon));
    }

    #[test]
    fn next_booking_approved_only() {
        let now = 100 * H;
        let waiting = booking(110 * H, 120 * H, BookingStatus::Waiting);
        let rejected = booking(110 * H, 120 * H, BookingStatus::Rejected);
        assert_eq!(next_booking(&[waiting, rejected], now), None);
    }

    #[test]
    fn next_booking_excludes_start_exactly_now() {
        let now = 100 * H;
        let starting = booking(now, 120 * H, BookingStatus::Approved);
        assert_eq!(next_booking(&[starting], now), None);
    }

    #[test]
    fn ties_resolve_to_smaller_id() {
        let now = 100 * H;
        let a = booking(10 * H, 20 * H, BookingStatus::Approved);
        let b = booking(10 * H, 20 * H, BookingStatus::Approved);
        let winner_id = a.id.min(b.id);
        let last = last_booking(&[a.clone(), b.clone()], now).unwrap();
        assert_eq!(last.id, winner_id);

        let c = booking(110 * H, 120 * H, BookingStatus::Approved);
        let d = booking(110 * H, 120 * H, BookingStatus::Approved);
        let winner_id = c.id.min(d.id);
        let next = next_booking(&[c, d], now).unwrap();
        assert_eq!(next.id, winner_id);
    }

    #[test]
    fn comments_sorted_newest_first() {
        let mk = |created: Ms| Comment {
            id: Ulid::new(),
            item_id: Ulid::new(),
            author_id: Ulid::new(),
            text: "x".into(),
            created,
        };
        let mut comments = vec![mk(100), mk(300), mk(200)];
        sort_comments(&mut comments);
        let created: Vec<Ms> = comments.iter().map(|c| c.created).collect();
        assert_eq!(created, vec![300, 200, 100]);
    }
}
