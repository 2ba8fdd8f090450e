use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only time type.
pub type Ms = i64;

/// Booked time range. `start` is strictly before `end`; construction
/// goes through `Engine::create_booking`, which validates the raw bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Booking state machine: `Waiting` is initial; `Approved` and `Rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

/// A request by `renter_id` to use `item_id` over `span`. `item_id` and
/// `renter_id` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub item_id: Ulid,
    pub renter_id: Ulid,
    pub span: Span,
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_past(&self, now: Ms) -> bool {
        self.span.end < now
    }

    pub fn is_future(&self, now: Ms) -> bool {
        self.span.start > now
    }

    /// Both bounds inclusive: a booking ending exactly now is still current.
    pub fn is_current(&self, now: Ms) -> bool {
        self.span.start <= now && now <= self.span.end
    }
}

/// Requested narrowing for booking listings, evaluated against the
/// wall clock at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateFilter {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl StateFilter {
    pub fn matches(&self, booking: &Booking, now: Ms) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Current => booking.is_current(now),
            StateFilter::Past => booking.is_past(now),
            StateFilter::Future => booking.is_future(now),
            StateFilter::Waiting => booking.status == BookingStatus::Waiting,
            StateFilter::Rejected => booking.status == BookingStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Ulid,
    pub owner_id: Ulid,
    pub name: String,
    /// Gates whether new bookings may be created.
    pub available: bool,
}

/// Left by a renter after a completed approved booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Ulid,
    pub item_id: Ulid,
    pub author_id: Ulid,
    pub text: String,
    pub created: Ms,
}

/// An item as rendered to a viewer: comments for everyone, the bookings
/// either side of now for the owner only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub item: Item,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
    pub comments: Vec<Comment>,
}
