use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mongo,
    InMemory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Mongo => write!(f, "mongodb"),
            BackendKind::InMemory => write!(f, "in-memory"),
        }
    }
}

/// Byte-level checkpoint storage keyed by thread id
///
/// Writes are last-writer-wins; no merging happens at this layer.
#[async_trait]
pub trait CheckpointBackend: Send + Sync {
    /// Fetch the stored checkpoint, `None` when the thread is unknown
    async fn get(&self, thread_id: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the stored checkpoint for a thread
    async fn put(&self, thread_id: &str, bytes: Vec<u8>) -> Result<()>;

    /// Release connections held by the backend
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> BackendKind;
}
