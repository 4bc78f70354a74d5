//! Sample content written to empty slots on first start

use chrono::NaiveDate;

use super::types::{
    Chapter, ChapterRecord, ChapterStatus, Language, Testimonial, TestimonialStatus,
    PARAGRAPH_DELIMITER,
};

const ENGLISH_INTRODUCTION_TITLE: &str = "Introduction to Islamic Healthcare Philosophy";

const ENGLISH_INTRODUCTION: &[&str] = &[
    r#"In the name of Allah, the Most Gracious, the Most Merciful."#,
    r#"Healthcare in Islam is not merely a physical endeavor but a holistic approach that encompasses the spiritual, mental, and physical well-being of the individual. The concept of human autonomy within Islamic healthcare science represents a profound understanding that bridges ancient wisdom with modern medical ethics."#,
    r#"The Quran states: "And whoever saves a life, it is as though he has saved all of mankind" (5:32). This verse encapsulates the sacred duty of preserving life while respecting the divine autonomy granted to each individual."#,
    r#"In this exploration, we delve into how Islamic principles guide healthcare decisions while honoring the fundamental concept of free will (ikhtiyar) that Allah has bestowed upon humanity. The balance between divine guidance and human choice forms the cornerstone of ethical healthcare practice in Islamic tradition."#,
    r#"Through the lens of Sufi spirituality, we understand that true healing encompasses not just the body, but the purification of the soul (tazkiyah) and the alignment of one's will with divine wisdom. This comprehensive approach to healthcare acknowledges that each individual possesses an innate capacity for self-determination while remaining connected to the divine source of all healing."#,
];

const URDU_INTRODUCTION_TITLE: &str = "اسلامی صحت کی فلسفہ کا تعارف";

const URDU_INTRODUCTION: &[&str] = &[
    r#"بسم اللہ الرحمن الرحیم"#,
    r#"اسلام میں صحت کی دیکھ بھال صرف جسمانی کوشش نہیں بلکہ ایک جامع نقطہ نظر ہے جو فرد کی روحانی، ذہنی اور جسمانی بہبودی کو شامل کرتا ہے۔ اسلامی صحت کی سائنس کے اندر انسانی خودمختاری کا تصور ایک گہری فہم کو ظاہر کرتا ہے جو قدیم حکمت کو جدید طبی اخلاقیات سے جوڑتا ہے۔"#,
    r#"قرآن میں ارشاد ہے: "اور جو کوئی ایک جان کو بچائے، گویا اس نے تمام انسانوں کو بچایا" (5:32)۔ یہ آیت زندگی کے تحفظ کی مقدس ذمہ داری کو سمیٹتی ہے جبکہ ہر فرد کو عطا کردہ الہی خودمختاری کا احترام کرتی ہے۔"#,
    r#"اس تجسس میں، ہم یہ دیکھتے ہیں کہ اسلامی اصول کیسے صحت کی دیکھ بھال کے فیصلوں میں رہنمائی کرتے ہیں جبکہ آزاد مرضی (اختیار) کے بنیادی تصور کا احترام کرتے ہیں جو اللہ نے انسانوں کو عطا کیا ہے۔"#,
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn published(id: u32, title: &str, paragraphs: &[&str], language: Language) -> ChapterRecord {
    ChapterRecord {
        chapter: Chapter {
            id,
            title: title.to_string(),
            content: paragraphs.join(PARAGRAPH_DELIMITER),
            language,
        },
        status: ChapterStatus::Published,
        last_modified: date(2024, 1, 15),
        images: Vec::new(),
    }
}

fn approved(
    id: u32,
    name: &str,
    location: &str,
    rating: u8,
    text: &str,
    date: NaiveDate,
    helpful: u32,
) -> Testimonial {
    Testimonial {
        id,
        name: name.to_string(),
        location: location.to_string(),
        rating,
        text: text.to_string(),
        status: TestimonialStatus::Approved,
        date,
        verified: true,
        helpful,
    }
}

/// The book's introduction in both languages, published
pub fn chapters() -> Vec<ChapterRecord> {
    vec![
        published(
            1,
            ENGLISH_INTRODUCTION_TITLE,
            ENGLISH_INTRODUCTION,
            Language::English,
        ),
        published(2, URDU_INTRODUCTION_TITLE, URDU_INTRODUCTION, Language::Urdu),
    ]
}

/// Verified early reviews, newest first
pub fn testimonials() -> Vec<Testimonial> {
    vec![
        approved(
            1,
            "Dr. Sarah Ahmed",
            "London, UK",
            5,
            "This book beautifully bridges the gap between Islamic wisdom and modern healthcare ethics. As a practicing physician, I found the insights on patient autonomy particularly enlightening. The author's Sufi perspective adds a spiritual dimension that is often missing in contemporary medical literature.",
            date(2024, 1, 15),
            24,
        ),
        approved(
            2,
            "Ahmad Ibn Muhammad",
            "Islamabad, Pakistan",
            5,
            "ما شاء اللہ! This work provides profound insights into how Islamic principles can guide healthcare decisions while respecting human dignity. The bilingual approach makes it accessible to both English and Urdu readers. A must-read for healthcare professionals.",
            date(2024, 1, 10),
            18,
        ),
        approved(
            3,
            "Fatima Al-Zahra",
            "Cairo, Egypt",
            4,
            "The book's exploration of divine guidance versus human autonomy in healthcare is thought-provoking. It helped me understand how to balance my medical training with my Islamic faith. The practical applications are particularly valuable.",
            date(2024, 1, 5),
            15,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_chapters_are_published_and_paragraphed() {
        let chapters = chapters();
        assert_eq!(chapters.len(), 2);
        assert!(chapters.iter().all(|c| c.is_published()));
        assert_eq!(chapters[0].chapter.language, Language::English);
        assert_eq!(chapters[0].chapter.paragraphs().count(), ENGLISH_INTRODUCTION.len());
        assert!(chapters[0].chapter.content.contains("free will (ikhtiyar)"));
        assert_eq!(chapters[1].chapter.language, Language::Urdu);
    }

    #[test]
    fn test_seed_testimonials_have_unique_ids() {
        let testimonials = testimonials();
        let mut ids: Vec<u32> = testimonials.iter().map(|t| t.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(testimonials.iter().all(|t| t.verified));
    }
}
