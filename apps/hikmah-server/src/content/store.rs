//! Slot-backed storage for chapter records and testimonials

use chrono::{NaiveDate, Utc};

use super::seed;
use super::types::{
    validate_image_url, Chapter, ChapterDraft, ChapterRecord, ContentOverview, Moderation,
    Testimonial, TestimonialStatus, TestimonialSubmission, TestimonialSummary,
};
use crate::error::{Result, StorageError};
use crate::storage::{LoadWarning, RecordSlot, SharedSlots};

/// Slot holding chapter records
pub const CHAPTERS_SLOT: &str = "hikmah-chapters";

/// Slot holding testimonials
pub const TESTIMONIALS_SLOT: &str = "hikmah-testimonials";

/// Source of the current calendar date
pub type Today = fn() -> NaiveDate;

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Exclusive owner of chapter records and testimonials
pub struct ContentStore {
    slots: SharedSlots,
    chapters: RecordSlot<ChapterRecord>,
    testimonials: RecordSlot<Testimonial>,
    today: Today,
}

impl ContentStore {
    /// Load both collections, writing the sample content into absent slots when `seed` is set
    ///
    /// A slot that existed but could not be decoded is never reseeded.
    pub fn open(
        slots: SharedSlots,
        seed: bool,
    ) -> std::result::Result<(Self, Vec<LoadWarning>), StorageError> {
        let (mut chapters, chapter_warning) =
            RecordSlot::<ChapterRecord>::load(slots.as_ref(), CHAPTERS_SLOT)?;
        let (mut testimonials, testimonial_warning) =
            RecordSlot::<Testimonial>::load(slots.as_ref(), TESTIMONIALS_SLOT)?;

        if seed && !chapters.was_stored() {
            chapters.commit(slots.as_ref(), |records| *records = seed::chapters())?;
            tracing::info!(count = chapters.records().len(), "Seeded chapters");
        }
        if seed && !testimonials.was_stored() {
            testimonials.commit(slots.as_ref(), |records| *records = seed::testimonials())?;
            tracing::info!(count = testimonials.records().len(), "Seeded testimonials");
        }

        let warnings: Vec<LoadWarning> = chapter_warning
            .into_iter()
            .chain(testimonial_warning)
            .collect();

        tracing::info!(
            chapters = chapters.records().len(),
            testimonials = testimonials.records().len(),
            warnings = warnings.len(),
            "Content store opened"
        );

        Ok((
            Self {
                slots,
                chapters,
                testimonials,
                today: utc_today,
            },
            warnings,
        ))
    }

    /// Replace the date source
    pub fn with_today(mut self, today: Today) -> Self {
        self.today = today;
        self
    }

    // ========================================================================
    // Chapters
    // ========================================================================

    /// All chapter records, drafts included
    pub fn chapters(&self) -> &[ChapterRecord] {
        self.chapters.records()
    }

    pub fn chapter(&self, id: u32) -> Option<&ChapterRecord> {
        self.chapters.records().iter().find(|c| c.id() == id)
    }

    /// Published chapters in stored order; what the reader and search see
    pub fn published_corpus(&self) -> Vec<Chapter> {
        self.chapters
            .records()
            .iter()
            .filter(|c| c.is_published())
            .map(|c| c.chapter.clone())
            .collect()
    }

    pub fn add_chapter(&mut self, draft: ChapterDraft) -> Result<ChapterRecord> {
        draft.validate()?;

        let id = self
            .chapters
            .records()
            .iter()
            .map(ChapterRecord::id)
            .max()
            .unwrap_or(0)
            + 1;
        let record = record_from_draft(id, draft, (self.today)());

        self.chapters
            .commit(self.slots.as_ref(), |records| records.push(record.clone()))?;

        tracing::info!(chapter_id = id, status = ?record.status, "Added chapter");
        Ok(record)
    }

    /// Replace a chapter's fields; `None` when the id was unknown
    pub fn update_chapter(&mut self, id: u32, draft: ChapterDraft) -> Result<Option<ChapterRecord>> {
        draft.validate()?;

        let Some(index) = self.chapter_index(id) else {
            return Ok(None);
        };

        let record = record_from_draft(id, draft, (self.today)());
        self.chapters.commit(self.slots.as_ref(), |records| {
            records[index] = record.clone();
        })?;

        tracing::info!(chapter_id = id, "Updated chapter");
        Ok(Some(record))
    }

    /// Delete a chapter; returns false when the id was unknown
    pub fn delete_chapter(&mut self, id: u32) -> Result<bool> {
        if self.chapter_index(id).is_none() {
            return Ok(false);
        }

        self.chapters
            .commit(self.slots.as_ref(), |records| records.retain(|c| c.id() != id))?;

        tracing::info!(chapter_id = id, "Deleted chapter");
        Ok(true)
    }

    /// Append image data URLs to a chapter
    pub fn attach_images(&mut self, id: u32, urls: Vec<String>) -> Result<Option<ChapterRecord>> {
        urls.iter().try_for_each(|url| validate_image_url(url))?;

        let Some(index) = self.chapter_index(id) else {
            return Ok(None);
        };

        let today = (self.today)();
        let count = urls.len();
        let record = self.chapters.commit(self.slots.as_ref(), |records| {
            let record = &mut records[index];
            record.images.extend(urls);
            record.last_modified = today;
            record.clone()
        })?;

        tracing::info!(chapter_id = id, count, "Attached images");
        Ok(Some(record))
    }

    /// Drop every copy of `url` from a chapter's images
    pub fn remove_image(&mut self, id: u32, url: &str) -> Result<Option<ChapterRecord>> {
        let Some(index) = self.chapter_index(id) else {
            return Ok(None);
        };

        if !self.chapters.records()[index].images.iter().any(|i| i == url) {
            return Ok(Some(self.chapters.records()[index].clone()));
        }

        let today = (self.today)();
        let record = self.chapters.commit(self.slots.as_ref(), |records| {
            let record = &mut records[index];
            record.images.retain(|i| i != url);
            record.last_modified = today;
            record.clone()
        })?;

        tracing::debug!(chapter_id = id, "Removed image");
        Ok(Some(record))
    }

    fn chapter_index(&self, id: u32) -> Option<usize> {
        self.chapters.records().iter().position(|c| c.id() == id)
    }

    // ========================================================================
    // Testimonials
    // ========================================================================

    /// All testimonials, newest submission first
    pub fn testimonials(&self) -> &[Testimonial] {
        self.testimonials.records()
    }

    pub fn testimonial(&self, id: u32) -> Option<&Testimonial> {
        self.testimonials.records().iter().find(|t| t.id == id)
    }

    /// Testimonials visible to readers
    pub fn approved_testimonials(&self) -> Vec<Testimonial> {
        self.testimonials
            .records()
            .iter()
            .filter(|t| t.status == TestimonialStatus::Approved)
            .cloned()
            .collect()
    }

    /// Queue a reader's testimonial for moderation
    pub fn submit_testimonial(&mut self, submission: TestimonialSubmission) -> Result<Testimonial> {
        submission.validate()?;

        let id = self
            .testimonials
            .records()
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1;
        let testimonial = Testimonial {
            id,
            name: submission.name.trim().to_string(),
            location: submission.location.trim().to_string(),
            rating: submission.rating,
            text: submission.text.trim().to_string(),
            status: TestimonialStatus::Pending,
            date: (self.today)(),
            verified: false,
            helpful: 0,
        };

        self.testimonials
            .commit(self.slots.as_ref(), |records| records.insert(0, testimonial.clone()))?;

        tracing::info!(testimonial_id = id, rating = testimonial.rating, "Testimonial submitted");
        Ok(testimonial)
    }

    /// Approve or reject; `None` when the id was unknown
    pub fn moderate_testimonial(&mut self, id: u32, decision: Moderation) -> Result<Option<Testimonial>> {
        let Some(index) = self.testimonials.records().iter().position(|t| t.id == id) else {
            return Ok(None);
        };

        let status = decision.status();
        let testimonial = self.testimonials.commit(self.slots.as_ref(), |records| {
            records[index].status = status;
            records[index].clone()
        })?;

        tracing::info!(testimonial_id = id, status = ?status, "Testimonial moderated");
        Ok(Some(testimonial))
    }

    /// Count one "helpful" vote; only approved testimonials can be voted on
    pub fn mark_helpful(&mut self, id: u32) -> Result<Option<Testimonial>> {
        let Some(index) = self
            .testimonials
            .records()
            .iter()
            .position(|t| t.id == id && t.status == TestimonialStatus::Approved)
        else {
            return Ok(None);
        };

        let testimonial = self.testimonials.commit(self.slots.as_ref(), |records| {
            records[index].helpful = records[index].helpful.saturating_add(1);
            records[index].clone()
        })?;

        tracing::debug!(testimonial_id = id, helpful = testimonial.helpful, "Helpful vote");
        Ok(Some(testimonial))
    }

    /// Statistics over the approved testimonials
    pub fn testimonial_summary(&self) -> TestimonialSummary {
        let approved = self.approved_testimonials();
        let count = approved.len();
        let average_rating = if count == 0 {
            None
        } else {
            let total: u32 = approved.iter().map(|t| u32::from(t.rating)).sum();
            Some((f64::from(total) / count as f64 * 10.0).round() / 10.0)
        };

        TestimonialSummary {
            count,
            average_rating,
            verified_count: approved.iter().filter(|t| t.verified).count(),
        }
    }

    /// Dashboard counters
    pub fn overview(&self) -> ContentOverview {
        let chapters = self.chapters.records();
        let testimonials = self.testimonials.records();
        ContentOverview {
            total_chapters: chapters.len(),
            published_chapters: chapters.iter().filter(|c| c.is_published()).count(),
            total_testimonials: testimonials.len(),
            pending_testimonials: testimonials
                .iter()
                .filter(|t| t.status == TestimonialStatus::Pending)
                .count(),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn flush(&self) -> std::result::Result<(), StorageError> {
        self.chapters.flush(self.slots.as_ref())?;
        self.testimonials.flush(self.slots.as_ref())
    }

    pub fn close(self) -> std::result::Result<(), StorageError> {
        self.flush()?;
        tracing::info!("Content store closed");
        Ok(())
    }
}

fn record_from_draft(id: u32, draft: ChapterDraft, today: NaiveDate) -> ChapterRecord {
    ChapterRecord {
        chapter: Chapter {
            id,
            title: draft.title.trim().to_string(),
            content: draft.content,
            language: draft.language,
        },
        status: draft.status,
        last_modified: today,
        images: draft.images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::content::{ChapterStatus, Language};
    use crate::error::{AppError, ValidationError};
    use crate::storage::MemorySlotStore;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn open_seeded(slots: &Arc<MemorySlotStore>) -> ContentStore {
        let (store, warnings) = ContentStore::open(slots.clone(), true).unwrap();
        assert!(warnings.is_empty());
        store.with_today(fixed_today)
    }

    fn draft(title: &str, status: ChapterStatus) -> ChapterDraft {
        ChapterDraft {
            title: title.to_string(),
            content: "First paragraph.\n\nSecond paragraph.".to_string(),
            language: Language::English,
            status,
            images: Vec::new(),
        }
    }

    fn submission(rating: u8) -> TestimonialSubmission {
        TestimonialSubmission {
            name: " Yusuf ".to_string(),
            location: "Lahore".to_string(),
            rating,
            text: "Very helpful".to_string(),
        }
    }

    #[test]
    fn test_seeding_only_fills_absent_slots() {
        let slots = Arc::new(MemorySlotStore::new());
        let store = open_seeded(&slots);
        assert_eq!(store.chapters().len(), 2);
        assert_eq!(store.testimonials().len(), 3);
        assert!(slots.contains(CHAPTERS_SLOT));

        // An emptied but stored slot stays empty
        let mut store = store;
        assert!(store.delete_chapter(1).unwrap());
        assert!(store.delete_chapter(2).unwrap());
        drop(store);

        let store = open_seeded(&slots);
        assert!(store.chapters().is_empty());

        let (unseeded, _) = ContentStore::open(Arc::new(MemorySlotStore::new()), false).unwrap();
        assert!(unseeded.chapters().is_empty());
        assert!(unseeded.testimonials().is_empty());
    }

    #[test]
    fn test_chapter_crud() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);

        let added = store.add_chapter(draft("On Patience", ChapterStatus::Draft)).unwrap();
        assert_eq!(added.id(), 3);
        assert_eq!(added.last_modified, fixed_today());
        assert_eq!(store.published_corpus().len(), 2);

        let updated = store
            .update_chapter(3, draft("On Patience", ChapterStatus::Published))
            .unwrap()
            .unwrap();
        assert!(updated.is_published());
        assert_eq!(store.published_corpus().len(), 3);

        assert!(store
            .update_chapter(99, draft("Missing", ChapterStatus::Draft))
            .unwrap()
            .is_none());
        assert!(!store.delete_chapter(99).unwrap());
    }

    #[test]
    fn test_chapter_ids_do_not_collide_after_delete() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);

        assert!(store.delete_chapter(1).unwrap());
        let added = store.add_chapter(draft("New", ChapterStatus::Draft)).unwrap();
        assert_eq!(added.id(), 3);
    }

    #[test]
    fn test_chapter_validation() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);

        let err = store.add_chapter(draft("  ", ChapterStatus::Draft)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::EmptyChapterTitle)
        ));
        assert_eq!(store.chapters().len(), 2);
    }

    #[test]
    fn test_images() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);
        let png = "data:image/png;base64,iVBORw0KGgo=".to_string();

        let record = store.attach_images(1, vec![png.clone()]).unwrap().unwrap();
        assert_eq!(record.images, vec![png.clone()]);

        let err = store
            .attach_images(1, vec!["data:text/plain;base64,aGk=".to_string()])
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::UnsupportedImage(_))));

        let record = store.remove_image(1, &png).unwrap().unwrap();
        assert!(record.images.is_empty());
        assert!(store.remove_image(42, &png).unwrap().is_none());
    }

    #[test]
    fn test_testimonial_submission_and_moderation() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);

        let submitted = store.submit_testimonial(submission(4)).unwrap();
        assert_eq!(submitted.id, 4);
        assert_eq!(submitted.name, "Yusuf");
        assert_eq!(submitted.status, TestimonialStatus::Pending);
        assert!(!submitted.verified);
        assert_eq!(store.testimonials()[0].id, 4);
        assert_eq!(store.overview().pending_testimonials, 1);

        // Pending testimonials take no votes
        assert!(store.mark_helpful(4).unwrap().is_none());

        let approved = store
            .moderate_testimonial(4, Moderation::Approve)
            .unwrap()
            .unwrap();
        assert_eq!(approved.status, TestimonialStatus::Approved);
        assert_eq!(store.mark_helpful(4).unwrap().unwrap().helpful, 1);
        assert!(store.moderate_testimonial(99, Moderation::Reject).unwrap().is_none());

        let err = store.submit_testimonial(submission(6)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::RatingOutOfRange(6))
        ));
    }

    #[test]
    fn test_summary_and_overview() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);

        let summary = store.testimonial_summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, Some(4.7));
        assert_eq!(summary.verified_count, 3);

        store.submit_testimonial(submission(1)).unwrap();
        store.moderate_testimonial(4, Moderation::Approve).unwrap();
        let summary = store.testimonial_summary();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.average_rating, Some(3.8));
        assert_eq!(summary.verified_count, 3);

        let overview = store.overview();
        assert_eq!(overview.total_chapters, 2);
        assert_eq!(overview.published_chapters, 2);
        assert_eq!(overview.total_testimonials, 4);
        assert_eq!(overview.pending_testimonials, 0);

        let (empty, _) = ContentStore::open(Arc::new(MemorySlotStore::new()), false).unwrap();
        assert_eq!(empty.testimonial_summary().average_rating, None);
    }

    #[test]
    fn test_content_survives_restart() {
        let slots = Arc::new(MemorySlotStore::new());
        let mut store = open_seeded(&slots);
        store.add_chapter(draft("Persisted", ChapterStatus::Published)).unwrap();
        store.close().unwrap();

        let reopened = open_seeded(&slots);
        assert_eq!(reopened.chapters().len(), 3);
        assert_eq!(reopened.chapter(3).unwrap().chapter.title, "Persisted");
    }
}
