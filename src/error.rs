use thiserror::Error;

/// Why the conflict engine turned a proposed booking away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("maximum bookings reached for this slot")]
    CapacityExceeded,
    #[error("booking must match the slot times exactly")]
    RangeMismatch,
    #[error("booking must lie inside the slot window")]
    OutOfBounds,
    #[error("booking start must come before its end")]
    InvertedRange,
    #[error("booking overlaps an existing booking")]
    TimeConflict,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::CapacityExceeded => "CapacityExceeded",
            RejectReason::RangeMismatch => "RangeMismatch",
            RejectReason::OutOfBounds => "OutOfBounds",
            RejectReason::InvertedRange => "InvertedRange",
            RejectReason::TimeConflict => "TimeConflict",
        }
    }
}

/// Infrastructure failure in the record store. Nothing was committed, so the
/// caller may retry; this service never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage unavailable: {0}")]
pub struct StoreError(pub String);

/// `NotFound` and `Forbidden` stay separate variants even though an API layer
/// may choose to mask one as the other; collapsing them in the type system
/// would lose the distinction for callers that need it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("availability slot not found")]
    SlotNotFound,
    #[error("resource not found")]
    NotFound,
    #[error("caller does not own this resource")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(RejectReason),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::SlotNotFound => "SlotNotFound",
            Error::NotFound => "NotFound",
            Error::Forbidden => "Forbidden",
            Error::Validation(_) => "ValidationError",
            Error::Rejected(reason) => reason.code(),
            Error::Storage(_) => "StorageUnavailable",
        }
    }
}

impl From<RejectReason> for Error {
    fn from(reason: RejectReason) -> Self {
        Error::Rejected(reason)
    }
}
