use crate::error::StoreError;
use crate::store::{MemoryStore, RecordStore};
use crate::types::{AvailabilitySlot, Booking, User};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use uuid::Uuid;

/// Store double for infrastructure-failure tests: behaves like `MemoryStore`
/// until `set_failing(true)`, after which every call errors.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn gate(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError("injected failure".into()));
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.gate()?;
        self.inner.find_user(id)
    }

    fn find_user_by_slug(&self, slug: &str) -> Result<Option<User>, StoreError> {
        self.gate()?;
        self.inner.find_user_by_slug(slug)
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.insert_user(user)
    }

    fn update_user(&self, user: User) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.update_user(user)
    }

    fn slots_for_owner(&self, owner_id: &str) -> Result<Vec<AvailabilitySlot>, StoreError> {
        self.gate()?;
        self.inner.slots_for_owner(owner_id)
    }

    fn find_slot(&self, id: Uuid) -> Result<Option<AvailabilitySlot>, StoreError> {
        self.gate()?;
        self.inner.find_slot(id)
    }

    fn insert_slot(&self, slot: AvailabilitySlot) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.insert_slot(slot)
    }

    fn update_slot(&self, slot: AvailabilitySlot) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.update_slot(slot)
    }

    fn delete_slot(&self, id: Uuid) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.delete_slot(id)
    }

    fn bookings_for_slot(&self, slot_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        self.gate()?;
        self.inner.bookings_for_slot(slot_id)
    }

    fn bookings_for_requester(&self, requester_id: &str) -> Result<Vec<Booking>, StoreError> {
        self.gate()?;
        self.inner.bookings_for_requester(requester_id)
    }

    fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        self.gate()?;
        self.inner.find_booking(id)
    }

    fn insert_booking(&self, booking: Booking) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.insert_booking(booking)
    }

    fn delete_booking(&self, id: Uuid) -> Result<(), StoreError> {
        self.gate()?;
        self.inner.delete_booking(id)
    }
}
