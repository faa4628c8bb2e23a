use crate::error::RejectReason;
use crate::policy::validate_range;
use crate::time_range::TimeRange;
use crate::types::{AvailabilitySlot, Booking, BookingMode};

/// Decides whether `proposed` may be committed against `slot` given the
/// bookings already on it. Pure: the caller owns the snapshot and the insert.
///
/// Capacity is checked first so a full slot reports full even for a malformed
/// proposal. The overlap scan only runs for FLEXIBLE slots; every booking on a
/// FIXED slot shares the slot bounds, so capacity alone bounds them.
pub fn check(
    slot: &AvailabilitySlot,
    existing: &[Booking],
    proposed: TimeRange,
) -> Result<(), RejectReason> {
    if existing.len() as u32 >= slot.max_bookings {
        return Err(RejectReason::CapacityExceeded);
    }

    validate_range(slot.booking_mode, slot.window(), proposed)?;

    if slot.booking_mode == BookingMode::Flexible
        && existing.iter().any(|booking| booking.range().overlaps(&proposed))
    {
        return Err(RejectReason::TimeConflict);
    }

    Ok(())
}
