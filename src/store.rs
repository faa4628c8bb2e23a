use crate::error::StoreError;
use crate::types::{AvailabilitySlot, Booking, User};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

/// Persistence collaborator injected into the services. Implementations only
/// provide lookup, filtering and single-record writes; all booking/ownership
/// rules live above this trait.
pub trait RecordStore: Clone + Send + Sync + 'static {
    fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    fn find_user_by_slug(&self, slug: &str) -> Result<Option<User>, StoreError>;
    fn insert_user(&self, user: User) -> Result<(), StoreError>;
    fn update_user(&self, user: User) -> Result<(), StoreError>;

    fn slots_for_owner(&self, owner_id: &str) -> Result<Vec<AvailabilitySlot>, StoreError>;
    fn find_slot(&self, id: Uuid) -> Result<Option<AvailabilitySlot>, StoreError>;
    fn insert_slot(&self, slot: AvailabilitySlot) -> Result<(), StoreError>;
    fn update_slot(&self, slot: AvailabilitySlot) -> Result<(), StoreError>;
    fn delete_slot(&self, id: Uuid) -> Result<(), StoreError>;

    fn bookings_for_slot(&self, slot_id: Uuid) -> Result<Vec<Booking>, StoreError>;
    fn bookings_for_requester(&self, requester_id: &str) -> Result<Vec<Booking>, StoreError>;
    fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;
    fn insert_booking(&self, booking: Booking) -> Result<(), StoreError>;
    fn delete_booking(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Records {
    users: HashMap<String, User>,
    slots: HashMap<Uuid, AvailabilitySlot>,
    bookings: HashMap<Uuid, Booking>,
}

/// In-memory store, the shipped implementation and the test double for the
/// services. One mutex over all records; per-slot serialization of the
/// booking path is the ledger's job, not the store's.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Records>>,
}

impl RecordStore for MemoryStore {
    fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.users.get(id).cloned())
    }

    fn find_user_by_slug(&self, slug: &str) -> Result<Option<User>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.users.values().find(|user| user.slug == slug).cloned())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.users.insert(user.id.clone(), user);
        Ok(())
    }

    fn update_user(&self, user: User) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.users.insert(user.id.clone(), user);
        Ok(())
    }

    fn slots_for_owner(&self, owner_id: &str) -> Result<Vec<AvailabilitySlot>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .slots
            .values()
            .filter(|slot| slot.user_id == owner_id)
            .cloned()
            .collect())
    }

    fn find_slot(&self, id: Uuid) -> Result<Option<AvailabilitySlot>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.slots.get(&id).cloned())
    }

    fn insert_slot(&self, slot: AvailabilitySlot) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.slots.insert(slot.id, slot);
        Ok(())
    }

    fn update_slot(&self, slot: AvailabilitySlot) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.slots.insert(slot.id, slot);
        Ok(())
    }

    fn delete_slot(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.slots.remove(&id);
        Ok(())
    }

    fn bookings_for_slot(&self, slot_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .bookings
            .values()
            .filter(|booking| booking.slot_id == slot_id)
            .cloned()
            .collect())
    }

    fn bookings_for_requester(&self, requester_id: &str) -> Result<Vec<Booking>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .bookings
            .values()
            .filter(|booking| booking.user_id == requester_id)
            .cloned()
            .collect())
    }

    fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.bookings.get(&id).cloned())
    }

    fn insert_booking(&self, booking: Booking) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.bookings.insert(booking.id, booking);
        Ok(())
    }

    fn delete_booking(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.bookings.remove(&id);
        Ok(())
    }
}
