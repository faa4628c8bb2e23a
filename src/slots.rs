use crate::error::Error;
use crate::store::RecordStore;
use crate::types::{AvailabilitySlot, BookingMode, OwnerSummary};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SlotDraft {
    pub weekday: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub label: String,
    pub booking_mode: BookingMode,
    pub max_bookings: u32,
}

/// Slot lifecycle: owners publish, update and retract availability. Every
/// mutation resolves the record first so "no such slot" and "not your slot"
/// stay distinct outcomes.
#[derive(Debug, Clone)]
pub struct SlotDirectory<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> SlotDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn validate(weekday: u8, start: DateTime<Utc>, end: DateTime<Utc>, max: u32) -> Result<(), Error> {
        if start >= end {
            return Err(Error::Validation(
                "startTime must come before endTime".into(),
            ));
        }
        if weekday > 6 {
            return Err(Error::Validation("weekday must be between 0 and 6".into()));
        }
        if max < 1 {
            return Err(Error::Validation("maxBookings must be at least 1".into()));
        }
        Ok(())
    }

    pub fn mine(&self, owner_id: &str) -> Result<Vec<AvailabilitySlot>, Error> {
        Ok(self.store.slots_for_owner(owner_id)?)
    }

    /// Public calendar lookup: resolves the slug to its owner and returns the
    /// owner's branding summary next to the slots.
    pub fn public(&self, slug: &str) -> Result<(OwnerSummary, Vec<AvailabilitySlot>), Error> {
        let owner = self.store.find_user_by_slug(slug)?.ok_or(Error::NotFound)?;
        let slots = self.store.slots_for_owner(&owner.id)?;
        Ok((OwnerSummary::from(&owner), slots))
    }

    pub fn create(&self, owner_id: &str, draft: SlotDraft) -> Result<AvailabilitySlot, Error> {
        Self::validate(draft.weekday, draft.start_time, draft.end_time, draft.max_bookings)?;
        let slot = AvailabilitySlot {
            id: Uuid::new_v4(),
            user_id: owner_id.into(),
            weekday: draft.weekday,
            start_time: draft.start_time,
            end_time: draft.end_time,
            label: draft.label,
            booking_mode: draft.booking_mode,
            max_bookings: draft.max_bookings,
        };
        self.store.insert_slot(slot.clone())?;
        tracing::info!(slot_id = %slot.id, owner_id, "slot published");
        Ok(slot)
    }

    /// Bulk publish. Returns the owner's complete slot set after the insert,
    /// not just the new batch; callers must not assume otherwise.
    pub fn create_bulk(
        &self,
        owner_id: &str,
        drafts: Vec<SlotDraft>,
    ) -> Result<Vec<AvailabilitySlot>, Error> {
        for draft in &drafts {
            Self::validate(draft.weekday, draft.start_time, draft.end_time, draft.max_bookings)?;
        }
        for draft in drafts {
            self.create(owner_id, draft)?;
        }
        self.mine(owner_id)
    }

    pub fn update(&self, owner_id: &str, slot: AvailabilitySlot) -> Result<AvailabilitySlot, Error> {
        let existing = self.store.find_slot(slot.id)?.ok_or(Error::NotFound)?;
        if existing.user_id != owner_id {
            return Err(Error::Forbidden);
        }
        Self::validate(slot.weekday, slot.start_time, slot.end_time, slot.max_bookings)?;

        let mut updated = slot;
        updated.user_id = existing.user_id;
        self.store.update_slot(updated.clone())?;
        Ok(updated)
    }

    pub fn delete(&self, owner_id: &str, slot_id: Uuid) -> Result<(), Error> {
        let existing = self.store.find_slot(slot_id)?.ok_or(Error::NotFound)?;
        if existing.user_id != owner_id {
            return Err(Error::Forbidden);
        }
        self.store.delete_slot(slot_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{Role, User};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 19, hour, 0, 0).unwrap()
    }

    fn draft(start: u32, end: u32) -> SlotDraft {
        SlotDraft {
            weekday: 1,
            start_time: at(start),
            end_time: at(end),
            label: "Office hours".into(),
            booking_mode: BookingMode::Flexible,
            max_bookings: 2,
        }
    }

    #[test]
    fn create_then_mine_round_trip() {
        let directory = SlotDirectory::new(MemoryStore::default());
        let created = directory.create("alice", draft(9, 17)).unwrap();

        let mine = directory.mine("alice").unwrap();
        assert_eq!(mine, vec![created.clone()]);
        assert_eq!(created.label, "Office hours");
        assert_eq!(created.booking_mode, BookingMode::Flexible);
        assert_eq!(created.max_bookings, 2);
        assert_eq!(directory.mine("bob").unwrap(), vec![]);
    }

    #[test_case::test_case (draft(17, 9); "inverted range")]
    #[test_case::test_case (draft(9, 9); "empty range")]
    #[test_case::test_case (SlotDraft { weekday: 7, ..draft(9, 17) }; "weekday out of range")]
    #[test_case::test_case (SlotDraft { max_bookings: 0, ..draft(9, 17) }; "zero capacity")]
    fn create_rejects_invalid_input(bad: SlotDraft) {
        let directory = SlotDirectory::new(MemoryStore::default());
        assert!(matches!(
            directory.create("alice", bad),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn bulk_create_returns_the_full_owner_set() {
        let directory = SlotDirectory::new(MemoryStore::default());
        directory.create("alice", draft(8, 9)).unwrap();

        let all = directory
            .create_bulk("alice", vec![draft(9, 10), draft(10, 11)])
            .unwrap();
        // Pre-existing slot included, not just the new batch.
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|slot| slot.user_id == "alice"));
    }

    #[test]
    fn update_guards_ownership_before_validation() {
        let directory = SlotDirectory::new(MemoryStore::default());
        let slot = directory.create("alice", draft(9, 17)).unwrap();

        let mut renamed = slot.clone();
        renamed.label = "Afternoon only".into();
        assert_eq!(directory.update("bob", renamed.clone()), Err(Error::Forbidden));

        let mut unknown = renamed.clone();
        unknown.id = Uuid::new_v4();
        assert_eq!(directory.update("alice", unknown), Err(Error::NotFound));

        let updated = directory.update("alice", renamed).unwrap();
        assert_eq!(updated.label, "Afternoon only");
        assert_eq!(directory.mine("alice").unwrap(), vec![updated]);
    }

    #[test]
    fn update_cannot_reassign_the_owner() {
        let directory = SlotDirectory::new(MemoryStore::default());
        let slot = directory.create("alice", draft(9, 17)).unwrap();

        let mut hijacked = slot.clone();
        hijacked.user_id = "mallory".into();
        let updated = directory.update("alice", hijacked).unwrap();
        assert_eq!(updated.user_id, "alice");
    }

    #[test]
    fn delete_distinguishes_missing_from_foreign() {
        let directory = SlotDirectory::new(MemoryStore::default());
        let slot = directory.create("alice", draft(9, 17)).unwrap();

        assert_eq!(directory.delete("bob", slot.id), Err(Error::Forbidden));
        assert_eq!(directory.delete("alice", Uuid::new_v4()), Err(Error::NotFound));

        directory.delete("alice", slot.id).unwrap();
        assert_eq!(directory.mine("alice").unwrap(), vec![]);
    }

    #[test]
    fn public_lookup_by_slug() {
        let store = MemoryStore::default();
        let directory = SlotDirectory::new(store.clone());
        store
            .insert_user(User {
                id: "alice-id".into(),
                email: "alice@example.com".into(),
                name: "Alice".into(),
                slug: "alice".into(),
                role: Role::Owner,
                timezone: "UTC".into(),
                logo: Some("logo.png".into()),
                primary_color: None,
                secondary_color: None,
            })
            .unwrap();
        let slot = directory.create("alice-id", draft(9, 17)).unwrap();

        let (owner, slots) = directory.public("alice").unwrap();
        assert_eq!(owner.id, "alice-id");
        assert_eq!(owner.name, "Alice");
        assert_eq!(owner.logo.as_deref(), Some("logo.png"));
        assert_eq!(slots, vec![slot]);

        assert_eq!(directory.public("nobody").unwrap_err(), Error::NotFound);
    }
}
