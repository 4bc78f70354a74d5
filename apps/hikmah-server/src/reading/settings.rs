//! Display settings for the reader

use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 24;
pub const DEFAULT_FONT_SIZE: u32 = 16;

pub const MIN_BRIGHTNESS: u32 = 50;
pub const MAX_BRIGHTNESS: u32 = 100;
pub const BRIGHTNESS_STEP: u32 = 5;
pub const DEFAULT_BRIGHTNESS: u32 = 80;

/// Chapter titles render this many pixels above the body text
const TITLE_FONT_OFFSET: u32 = 8;

/// Font size in pixels and brightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSettings {
    font_size: u32,
    brightness: u32,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

impl ReadingSettings {
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn title_font_size(&self) -> u32 {
        self.font_size + TITLE_FONT_OFFSET
    }

    pub fn brightness(&self) -> u32 {
        self.brightness
    }

    /// Clamp into 12-24 px
    pub fn set_font_size(&mut self, px: u32) {
        self.font_size = px.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// Clamp into 50-100 % and snap to the nearest 5 % step
    pub fn set_brightness(&mut self, percent: u32) {
        let clamped = percent.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        let snapped = (clamped + BRIGHTNESS_STEP / 2) / BRIGHTNESS_STEP * BRIGHTNESS_STEP;
        self.brightness = snapped.min(MAX_BRIGHTNESS);
    }

    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(px) = update.font_size {
            self.set_font_size(px);
        }
        if let Some(percent) = update.brightness {
            self.set_brightness(percent);
        }
    }
}

/// Requested settings; out-of-range values are clamped, absent ones kept
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub font_size: Option<u32>,
    pub brightness: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ReadingSettings::default();
        assert_eq!(settings.font_size(), 16);
        assert_eq!(settings.title_font_size(), 24);
        assert_eq!(settings.brightness(), 80);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let mut settings = ReadingSettings::default();
        settings.set_font_size(4);
        assert_eq!(settings.font_size(), 12);
        settings.set_font_size(40);
        assert_eq!(settings.font_size(), 24);
        settings.set_font_size(18);
        assert_eq!(settings.font_size(), 18);
    }

    #[test]
    fn test_brightness_is_clamped_and_snapped() {
        let mut settings = ReadingSettings::default();
        settings.set_brightness(10);
        assert_eq!(settings.brightness(), 50);
        settings.set_brightness(250);
        assert_eq!(settings.brightness(), 100);
        settings.set_brightness(72);
        assert_eq!(settings.brightness(), 70);
        settings.set_brightness(73);
        assert_eq!(settings.brightness(), 75);
        settings.set_brightness(99);
        assert_eq!(settings.brightness(), 100);
    }

    #[test]
    fn test_partial_update() {
        let mut settings = ReadingSettings::default();
        settings.apply(SettingsUpdate {
            brightness: Some(55),
            ..Default::default()
        });
        assert_eq!(settings.font_size(), 16);
        assert_eq!(settings.brightness(), 55);
    }
}
