//! A record list mirrored to one durable slot

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::codec::{decode_records, encode_records};
use super::slots::SlotStore;
use crate::error::StorageError;

/// Reported when a slot existed but could not be decoded
///
/// The collection starts empty; the unreadable bytes are kept under
/// `backup_key` when the copy succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadWarning {
    pub key: String,
    pub reason: String,
    pub backup_key: Option<String>,
}

/// In-memory records plus the slot they are persisted to
#[derive(Debug, Clone)]
pub struct RecordSlot<T> {
    key: &'static str,
    records: Vec<T>,
    was_stored: bool,
}

impl<T> RecordSlot<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load the slot, falling back to an empty list when it is absent or unreadable
    pub fn load(
        slots: &dyn SlotStore,
        key: &'static str,
    ) -> Result<(Self, Option<LoadWarning>), StorageError> {
        let Some(bytes) = slots.read(key)? else {
            tracing::debug!(slot = key, "Slot absent, starting empty");
            return Ok((Self::empty(key, false), None));
        };

        match decode_records::<T>(&bytes) {
            Ok(records) => {
                tracing::debug!(slot = key, count = records.len(), "Loaded slot");
                Ok((
                    Self {
                        key,
                        records,
                        was_stored: true,
                    },
                    None,
                ))
            }
            Err(e) => {
                let backup_key = format!("{}.corrupt", key);
                let backup_key = match slots.write(&backup_key, &bytes) {
                    Ok(()) => Some(backup_key),
                    Err(backup_err) => {
                        tracing::error!(slot = key, error = %backup_err, "Failed to back up unreadable slot");
                        None
                    }
                };
                tracing::warn!(
                    slot = key,
                    error = %e,
                    backup = backup_key.as_deref().unwrap_or("none"),
                    "Unreadable slot, starting empty"
                );
                Ok((
                    Self::empty(key, true),
                    Some(LoadWarning {
                        key: key.to_string(),
                        reason: e.to_string(),
                        backup_key,
                    }),
                ))
            }
        }
    }

    fn empty(key: &'static str, was_stored: bool) -> Self {
        Self {
            key,
            records: Vec::new(),
            was_stored,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Whether the slot held any bytes when it was loaded
    pub fn was_stored(&self) -> bool {
        self.was_stored
    }

    /// Apply a mutation and persist the whole list
    ///
    /// The mutation runs on a copy; memory is only replaced once the write
    /// succeeded, so a failed write leaves the previous records in place.
    pub fn commit<R>(
        &mut self,
        slots: &dyn SlotStore,
        mutate: impl FnOnce(&mut Vec<T>) -> R,
    ) -> Result<R, StorageError> {
        let mut next = self.records.clone();
        let outcome = mutate(&mut next);
        Self::persist(slots, self.key, &next)?;
        self.records = next;
        self.was_stored = true;
        Ok(outcome)
    }

    /// Rewrite the slot from memory
    pub fn flush(&self, slots: &dyn SlotStore) -> Result<(), StorageError> {
        Self::persist(slots, self.key, &self.records)
    }

    fn persist(slots: &dyn SlotStore, key: &str, records: &[T]) -> Result<(), StorageError> {
        let bytes = encode_records(records).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        slots.write(key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlotStore;

    #[test]
    fn test_absent_slot_loads_empty() {
        let slots = MemorySlotStore::new();
        let (slot, warning) = RecordSlot::<u32>::load(&slots, "numbers").unwrap();
        assert!(slot.records().is_empty());
        assert!(!slot.was_stored());
        assert!(warning.is_none());
    }

    #[test]
    fn test_commit_persists_whole_list() {
        let slots = MemorySlotStore::new();
        let (mut slot, _) = RecordSlot::<u32>::load(&slots, "numbers").unwrap();

        slot.commit(&slots, |records| records.extend([1, 2, 3])).unwrap();
        slot.commit(&slots, |records| records.retain(|n| *n != 2)).unwrap();

        let (reloaded, warning) = RecordSlot::<u32>::load(&slots, "numbers").unwrap();
        assert!(warning.is_none());
        assert_eq!(reloaded.records(), &[1, 3]);
    }

    #[test]
    fn test_corrupt_slot_is_backed_up() {
        let slots = MemorySlotStore::new().with_slot("numbers", "{oops");
        let (slot, warning) = RecordSlot::<u32>::load(&slots, "numbers").unwrap();

        assert!(slot.records().is_empty());
        let warning = warning.unwrap();
        assert_eq!(warning.key, "numbers");
        assert_eq!(warning.backup_key.as_deref(), Some("numbers.corrupt"));
        assert_eq!(slots.read("numbers.corrupt").unwrap().unwrap(), b"{oops");
    }
}
