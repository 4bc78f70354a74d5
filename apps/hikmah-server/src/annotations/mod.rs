//! Annotation module
//!
//! Bookmarks (saved reading positions) and notes (free text tied to a
//! chapter), each kept as an insertion-ordered list in its own durable slot.

mod store;
mod types;

pub use store::{AnnotationStore, Clock, BOOKMARKS_SLOT, NOTES_SLOT};
pub use types::{Bookmark, BookmarkUpdate, Note};
