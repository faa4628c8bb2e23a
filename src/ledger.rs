use crate::conflict;
use crate::error::Error;
use crate::store::RecordStore;
use crate::time_range::TimeRange;
use crate::types::Booking;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub note: Option<String>,
}

/// Transactional boundary for bookings. Two concurrent creates against the
/// same slot could both read "capacity available" before either insert lands,
/// so `create` holds a mutex keyed by slot id across the whole
/// load-check-insert sequence. Slots are independent units of concurrency;
/// creates against different slots never wait on each other.
#[derive(Debug, Clone)]
pub struct BookingLedger<S: RecordStore> {
    store: S,
    slot_locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl<S: RecordStore> BookingLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            slot_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, slot_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.slot_locks.lock().unwrap();
        locks.entry(slot_id).or_default().clone()
    }

    pub fn list_for_requester(&self, requester_id: &str) -> Result<Vec<Booking>, Error> {
        Ok(self.store.bookings_for_requester(requester_id)?)
    }

    /// Conflict-checked insert. On rejection nothing is written, so the
    /// booking set for the slot is exactly what it was before the call.
    pub fn create(&self, requester_id: &str, draft: BookingDraft) -> Result<Booking, Error> {
        let slot_lock = self.lock_for(draft.slot_id);
        let _guard = slot_lock.lock().unwrap();

        let slot = self
            .store
            .find_slot(draft.slot_id)?
            .ok_or(Error::SlotNotFound)?;
        let existing = self.store.bookings_for_slot(draft.slot_id)?;
        let proposed = TimeRange::new(draft.start_time, draft.end_time);

        conflict::check(&slot, &existing, proposed)?;

        let booking = Booking {
            id: Uuid::new_v4(),
            slot_id: slot.id,
            owner_id: slot.user_id.clone(),
            user_id: requester_id.into(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            note: draft.note,
        };
        self.store.insert_booking(booking.clone())?;

        tracing::info!(booking_id = %booking.id, slot_id = %slot.id, "booking committed");
        Ok(booking)
    }

    /// Only the requester who made a booking may delete it; the slot owner
    /// holding a back-reference does not count.
    pub fn delete(&self, requester_id: &str, booking_id: Uuid) -> Result<(), Error> {
        let booking = self.store.find_booking(booking_id)?.ok_or(Error::NotFound)?;
        if booking.user_id != requester_id {
            return Err(Error::Forbidden);
        }
        self.store.delete_booking(booking_id)?;
        Ok(())
    }
}
