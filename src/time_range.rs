use chrono::{DateTime, Utc};

/// A `[start, end)` window over absolute instants. Comparing full timestamps
/// (rather than "HH:mm" strings) means two bookings at the same hour on
/// different days never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Both bounds count as inside, so a booking may begin or finish exactly
    /// on a slot boundary.
    pub fn contains(&self, point: DateTime<Utc>) -> bool {
        self.start <= point && point <= self.end
    }

    /// Strict overlap: ranges that merely touch (10:00-11:00 vs 11:00-12:00)
    /// do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}
