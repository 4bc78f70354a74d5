//! Content module
//!
//! Chapters in English and Urdu plus reader testimonials, managed through
//! the admin portal and persisted in durable slots.

mod seed;
mod store;
mod types;

pub use store::{ContentStore, Today, CHAPTERS_SLOT, TESTIMONIALS_SLOT};
pub use types::{
    validate_image_url, Chapter, ChapterDraft, ChapterRecord, ChapterStatus, ContentOverview,
    Language, Moderation, Testimonial, TestimonialStatus, TestimonialSubmission,
    TestimonialSummary, PARAGRAPH_DELIMITER,
};
