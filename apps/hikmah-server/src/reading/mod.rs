//! Reading module
//!
//! Where the reader is in the book, which language they read in, and how
//! the text is displayed.

mod session;
mod settings;

pub use session::{chapters_in, ReadingSession};
pub use settings::{
    ReadingSettings, SettingsUpdate, BRIGHTNESS_STEP, DEFAULT_BRIGHTNESS, DEFAULT_FONT_SIZE,
    MAX_BRIGHTNESS, MAX_FONT_SIZE, MIN_BRIGHTNESS, MIN_FONT_SIZE,
};
