//! Durable key-value slots
//!
//! Every record collection (bookmarks, notes, chapters, testimonials) lives in
//! one named slot and is rewritten as a whole after each mutation.

mod codec;
mod collection;
mod slots;

pub use codec::{decode_records, encode_records, DecodeError, SLOT_FORMAT_VERSION};
pub use collection::{LoadWarning, RecordSlot};
pub use slots::{FileSlotStore, MemorySlotStore, SharedSlots, SlotStore};
