//! Engine-wide validation bounds.

use crate::model::Ms;

/// 2000-01-01T00:00:00Z — anything earlier is a client bug.
pub const MIN_VALID_TIMESTAMP_MS: Ms = 946_684_800_000;

/// 3000-01-01T00:00:00Z.
pub const MAX_VALID_TIMESTAMP_MS: Ms = 32_503_680_000_000;

/// Bookings longer than a year are rejected.
pub const MAX_SPAN_DURATION_MS: Ms = 366 * 24 * 3_600_000;

/// Max comment text length in bytes.
pub const MAX_COMMENT_LEN: usize = 4096;
