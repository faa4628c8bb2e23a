use crate::error::RejectReason;
use crate::time_range::TimeRange;
use crate::types::BookingMode;

/// Per-mode range rule for a proposed booking against the slot window.
///
/// FIXED slots are all-or-nothing: the proposal must equal the slot bounds,
/// a contained sub-range is still a mismatch. FLEXIBLE slots accept any
/// non-empty sub-range whose endpoints both fall inside the window.
pub fn validate_range(
    mode: BookingMode,
    slot: TimeRange,
    proposed: TimeRange,
) -> Result<(), RejectReason> {
    match mode {
        BookingMode::Fixed => {
            if proposed != slot {
                return Err(RejectReason::RangeMismatch);
            }
            Ok(())
        }
        BookingMode::Flexible => {
            if !proposed.is_valid() {
                return Err(RejectReason::InvertedRange);
            }
            if !slot.contains(proposed.start) || !slot.contains(proposed.end) {
                return Err(RejectReason::OutOfBounds);
            }
            Ok(())
        }
    }
}
