//! Hikmah Server Library
//!
//! A bilingual (English/Urdu) book reading server. The main server binary is
//! in main.rs; everything it serves is exposed here for integration tests
//! and benchmarks.
//!
//! # Modules
//!
//! - `storage`: Durable key-value slots holding record lists
//! - `annotations`: Bookmarks and notes
//! - `content`: Chapters and testimonials
//! - `search`: Title/phrase/word matching with highlighted excerpts
//! - `reading`: Reading position and display settings
//! - `library`: Single owner of all of the above
//! - `service`: Owner thread and async handle for the library
//! - `routes`: HTTP API

pub mod annotations;
pub mod config;
pub mod content;
pub mod error;
pub mod library;
pub mod reading;
pub mod routes;
pub mod search;
pub mod service;
pub mod state;
pub mod storage;
