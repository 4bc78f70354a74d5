//! Library service actor
//!
//! The `Library` lives on one dedicated OS thread. Async handlers send it
//! closures through a cloneable `LibraryHandle` and await the result, so the
//! stores are never shared between threads and need no locks.

use tokio::sync::{mpsc, oneshot};

use crate::error::{AppError, ServiceError, StorageError};
use crate::library::Library;

/// Pending jobs before senders wait
const COMMAND_BUFFER: usize = 64;

type Job = Box<dyn FnOnce(&mut Library) + Send>;

enum Command {
    Run(Job),
    Shutdown(oneshot::Sender<Result<(), StorageError>>),
}

/// Starts the owner thread
pub struct LibraryService;

impl LibraryService {
    /// Move `library` onto its owner thread and return a handle to it
    pub fn start(library: Library) -> std::io::Result<LibraryHandle> {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

        std::thread::Builder::new()
            .name("hikmah-library".to_string())
            .spawn(move || run(library, rx))?;

        tracing::info!("Library service started");
        Ok(LibraryHandle { tx })
    }
}

fn run(mut library: Library, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.blocking_recv() {
        match command {
            Command::Run(job) => job(&mut library),
            Command::Shutdown(reply) => {
                let result = library.close();
                if let Err(e) = &result {
                    tracing::error!(error = %e, "Failed to flush library on shutdown");
                }
                let _ = reply.send(result);
                tracing::info!("Library service stopped");
                return;
            }
        }
    }

    // Every handle was dropped without an explicit shutdown
    if let Err(e) = library.close() {
        tracing::error!(error = %e, "Failed to flush library after last handle dropped");
    }
    tracing::info!("Library service stopped");
}

/// Cloneable access to the library owner thread
#[derive(Clone)]
pub struct LibraryHandle {
    tx: mpsc::Sender<Command>,
}

impl LibraryHandle {
    /// Run `f` on the owner thread and return its value
    pub async fn call<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Library) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |library| {
            let _ = reply_tx.send(f(library));
        });

        self.tx
            .send(Command::Run(job))
            .await
            .map_err(|_| ServiceError::Stopped)?;
        reply_rx.await.map_err(|_| ServiceError::Stopped)
    }

    /// Close the library and stop the owner thread
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Shutdown(reply_tx))
            .await
            .map_err(|_| ServiceError::Stopped)?;
        reply_rx.await.map_err(|_| ServiceError::Stopped)??;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::storage::MemorySlotStore;

    fn start(slots: &Arc<MemorySlotStore>) -> LibraryHandle {
        let (library, _) = Library::open(slots.clone(), &Config::default()).unwrap();
        LibraryService::start(library).unwrap()
    }

    #[tokio::test]
    async fn test_call_returns_value() {
        let slots = Arc::new(MemorySlotStore::new());
        let handle = start(&slots);

        let count = handle
            .call(|library| library.chapters(None).len())
            .await
            .unwrap();
        assert_eq!(count, 2);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_calls_from_many_tasks_are_serialized() {
        let slots = Arc::new(MemorySlotStore::new());
        let handle = start(&slots);

        let mut tasks = Vec::new();
        for i in 0..20 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle
                    .call(move |library| library.add_note(1, &format!("note {}", i), None))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap().unwrap();
        }

        let notes = handle
            .call(|library| library.annotations().notes().len())
            .await
            .unwrap();
        assert_eq!(notes, 20);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_calls_after_shutdown_fail() {
        let slots = Arc::new(MemorySlotStore::new());
        let handle = start(&slots);
        handle.shutdown().await.unwrap();

        let result = handle.call(|library| library.overview()).await;
        assert_eq!(result.unwrap_err(), ServiceError::Stopped);
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_shutdown_flushes_to_slots() {
        let slots = Arc::new(MemorySlotStore::new());
        let handle = start(&slots);
        handle
            .call(|library| library.add_bookmark(1, None, None, None))
            .await
            .unwrap()
            .unwrap();
        handle.shutdown().await.unwrap();

        let (library, _) = Library::open(slots.clone(), &Config::default()).unwrap();
        assert!(library.annotations().is_chapter_bookmarked(1));
    }
}
