//! Configuration management for Hikmah Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::content::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub reader: ReaderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per durable slot
    pub data_dir: PathBuf,
    /// Write the book's sample chapters and testimonials into empty slots
    pub seed_content: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    pub default_language: Language,
    /// CSS class placed on `<mark>` elements in search excerpts
    pub highlight_class: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
                seed_content: true,
            },
            reader: ReaderConfig {
                default_language: Language::English,
                highlight_class: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw.clone(),
            })?,
            Err(_) => defaults.server.port,
        };

        let seed_content = match env::var("HIKMAH_SEED_CONTENT") {
            Ok(raw) => parse_bool("HIKMAH_SEED_CONTENT", &raw)?,
            Err(_) => defaults.storage.seed_content,
        };

        let default_language = match env::var("HIKMAH_DEFAULT_LANGUAGE") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "HIKMAH_DEFAULT_LANGUAGE",
                value: raw.clone(),
            })?,
            Err(_) => defaults.reader.default_language,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            storage: StorageConfig {
                data_dir: env::var("HIKMAH_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.data_dir),
                seed_content,
            },
            reader: ReaderConfig {
                default_language,
                highlight_class: env::var("HIKMAH_HIGHLIGHT_CLASS")
                    .ok()
                    .filter(|class| !class.trim().is_empty()),
            },
        })
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
        }),
    }
}
