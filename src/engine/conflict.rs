use crate::model::*;

use super::EngineError;

pub(crate) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as Ms
}

/// Validate raw booking bounds and build the `Span`.
pub(crate) fn validate_range(start: Ms, end: Ms) -> Result<Span, EngineError> {
    use crate::limits::*;
    if start >= end {
        return Err(EngineError::InvalidSpan { start, end });
    }
    if start < MIN_VALID_TIMESTAMP_MS || end > MAX_VALID_TIMESTAMP_MS {
        return Err(EngineError::LimitExceeded("timestamp out of range"));
    }
    let span = Span::new(start, end);
    if span.duration_ms() > MAX_SPAN_DURATION_MS {
        return Err(EngineError::LimitExceeded("span too wide"));
    }
    Ok(span)
}

/// Only approved bookings hold the item; waiting and rejected ones never
/// block. Spans are half-open, so back-to-back bookings are not a conflict.
pub(crate) fn check_no_overlap(existing: &[Booking], span: &Span) -> Result<(), EngineError> {
    for booking in existing {
        if booking.status == BookingStatus::Approved && booking.span.overlaps(span) {
            return Err(EngineError::Conflict(booking.id));
        }
    }
    Ok(())
}
