//! Book content types
//!
//! Chapters are the unit of reading in one language. Chapter records add the
//! editorial fields used by the admin portal; only published records reach
//! the reader.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Language of a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Urdu,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Urdu => "urdu",
        }
    }

    /// The other language of the book
    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Urdu,
            Language::Urdu => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "urdu" | "ur" => Ok(Language::Urdu),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// A unit of book content in one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    /// Paragraphs separated by a blank line
    pub content: String,
    pub language: Language,
}

impl Chapter {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split(PARAGRAPH_DELIMITER)
    }
}

/// Blank-line paragraph delimiter
pub const PARAGRAPH_DELIMITER: &str = "\n\n";

/// Editorial state of a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
    Published,
    Draft,
}

/// A chapter as managed in the admin portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub status: ChapterStatus,
    pub last_modified: NaiveDate,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ChapterRecord {
    pub fn id(&self) -> u32 {
        self.chapter.id
    }

    pub fn is_published(&self) -> bool {
        self.status == ChapterStatus::Published
    }
}

/// Fields an editor supplies when creating or replacing a chapter
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDraft {
    pub title: String,
    pub content: String,
    pub language: Language,
    #[serde(default = "default_draft_status")]
    pub status: ChapterStatus,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_draft_status() -> ChapterStatus {
    ChapterStatus::Draft
}

impl ChapterDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyChapterTitle);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyChapterContent);
        }
        self.images.iter().try_for_each(|url| validate_image_url(url))
    }
}

/// Chapter images are inline `data:image/...;base64,` URLs
pub fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    let Some(rest) = url.strip_prefix("data:") else {
        return Err(ValidationError::UnsupportedImage("not a data URL".to_string()));
    };
    let mime = rest.split([';', ',']).next().unwrap_or_default();
    if !mime.starts_with("image/") || !rest.contains(";base64,") {
        return Err(ValidationError::UnsupportedImage(mime.to_string()));
    }
    Ok(())
}

/// Moderation state of a testimonial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    Pending,
    Approved,
    Rejected,
}

/// A reader's review of the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub rating: u8,
    pub text: String,
    pub status: TestimonialStatus,
    pub date: NaiveDate,
    pub verified: bool,
    pub helpful: u32,
}

/// A reader-submitted testimonial, before moderation
#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialSubmission {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    pub text: String,
}

fn default_rating() -> u8 {
    5
}

impl TestimonialSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTestimonialName);
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyTestimonialText);
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

/// Moderation decision for a pending testimonial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    Approve,
    Reject,
}

impl Moderation {
    pub fn status(self) -> TestimonialStatus {
        match self {
            Moderation::Approve => TestimonialStatus::Approved,
            Moderation::Reject => TestimonialStatus::Rejected,
        }
    }
}

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOverview {
    pub total_chapters: usize,
    pub published_chapters: usize,
    pub total_testimonials: usize,
    pub pending_testimonials: usize,
}

/// Public testimonial statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialSummary {
    pub count: usize,
    /// Mean rating rounded to one decimal; `None` without testimonials
    pub average_rating: Option<f64>,
    pub verified_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!("ur".parse::<Language>().unwrap(), Language::Urdu);
        assert!("french".parse::<Language>().is_err());
        assert_eq!(Language::Urdu.toggled(), Language::English);
    }

    #[test]
    fn test_chapter_record_serializes_flat() {
        let record = ChapterRecord {
            chapter: Chapter {
                id: 3,
                title: "Mercy".to_string(),
                content: "One.\n\nTwo.".to_string(),
                language: Language::English,
            },
            status: ChapterStatus::Draft,
            last_modified: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            images: vec![],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["language"], "english");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["lastModified"], "2024-01-15");

        let back: ChapterRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.chapter.paragraphs().count(), 2);
    }

    #[test]
    fn test_image_url_validation() {
        assert!(validate_image_url("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert_eq!(
            validate_image_url("data:text/html;base64,PGI+"),
            Err(ValidationError::UnsupportedImage("text/html".to_string()))
        );
        assert!(validate_image_url("https://example.com/a.png").is_err());
        assert!(validate_image_url("data:image/png,raw").is_err());
    }

    #[test]
    fn test_submission_validation() {
        let mut submission = TestimonialSubmission {
            name: "Amina".to_string(),
            location: String::new(),
            rating: 5,
            text: "Beautiful".to_string(),
        };
        assert!(submission.validate().is_ok());

        submission.rating = 0;
        assert_eq!(
            submission.validate(),
            Err(ValidationError::RatingOutOfRange(0))
        );

        submission.rating = 4;
        submission.name = "  ".to_string();
        assert_eq!(
            submission.validate(),
            Err(ValidationError::EmptyTestimonialName)
        );
    }
}
