//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, StorageError};
use crate::library::Library;
use crate::service::{LibraryHandle, LibraryService};
use crate::storage::{LoadWarning, SharedSlots};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to open library: {0}")]
    Open(#[from] StorageError),

    #[error("Failed to start library service: {0}")]
    ServiceStart(#[from] std::io::Error),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    library: LibraryHandle,
    load_warnings: Vec<LoadWarning>,
}

impl AppState {
    /// Open the library over `slots` and start its service thread
    pub fn open(config: Config, slots: SharedSlots) -> Result<Self, StateError> {
        let (library, load_warnings) = Library::open(slots, &config)?;
        for warning in &load_warnings {
            tracing::warn!(
                slot = %warning.key,
                backup = warning.backup_key.as_deref().unwrap_or("none"),
                "Slot could not be read: {}",
                warning.reason
            );
        }

        let library = LibraryService::start(library)?;

        Ok(Self::new(config, library, load_warnings))
    }

    pub fn new(config: Config, library: LibraryHandle, load_warnings: Vec<LoadWarning>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                library,
                load_warnings,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the library handle
    pub fn library(&self) -> &LibraryHandle {
        &self.inner.library
    }

    /// Slots that were unreadable at startup
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.inner.load_warnings
    }

    /// Flush and stop the library service
    pub async fn shutdown(&self) -> Result<(), AppError> {
        tracing::info!("Shutting down application state...");
        self.inner.library.shutdown().await
    }
}
