use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use intake_types::ThreadState;

use crate::backend::{BackendKind, CheckpointBackend};
use crate::builder::ThreadStateStoreBuilder;
use crate::dbs::memory::InMemoryBackend;
use crate::error::{PersistError, Result};

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-thread state persistence over a checkpoint backend.
///
/// The backend is chosen once, when the store is constructed, and kept for
/// the lifetime of the store.
pub struct ThreadStateStore {
    backend: Arc<dyn CheckpointBackend>,
    operation_timeout: Duration,
}

impl ThreadStateStore {
    pub fn builder() -> ThreadStateStoreBuilder {
        ThreadStateStoreBuilder::new()
    }

    pub fn with_backend(backend: Arc<dyn CheckpointBackend>) -> Self {
        Self {
            backend,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(InMemoryBackend::new()))
    }

    /// Use the durable backend if it connected, otherwise degrade to memory
    pub fn with_fallback(connected: Result<Arc<dyn CheckpointBackend>>) -> Self {
        match connected {
            Ok(backend) => Self::with_backend(backend),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Durable checkpoint backend unavailable; falling back to in-memory store"
                );
                Self::in_memory()
            }
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Load a thread's state; `Ok(None)` means the thread is unknown
    pub async fn load(&self, thread_id: &str) -> Result<Option<ThreadState>> {
        let bytes = self.bounded(self.backend.get(thread_id)).await?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the stored state for `state.thread_id`
    pub async fn save(&self, state: &ThreadState) -> Result<()> {
        let bytes = serde_json::to_vec(state)?;
        self.bounded(self.backend.put(&state.thread_id, bytes)).await
    }

    pub async fn close(&self) -> Result<()> {
        tracing::info!(backend = %self.backend_kind(), "Closing checkpoint store");
        self.backend.close().await
    }

    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.operation_timeout, operation)
            .await
            .map_err(|_| PersistError::Timeout(self.operation_timeout))?
    }
}
