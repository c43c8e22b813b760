use intake_persist::PersistError;
use thiserror::Error;

/// Failures that cross the orchestrator boundary.
///
/// Everything else (extraction trouble, load failures, an unreachable
/// durable backend) is absorbed with a deterministic fallback.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Invalid intake request: {0}")]
    Validation(String),

    #[error("Failed to persist state for thread {thread_id}: {source}")]
    PersistenceWriteFailed {
        thread_id: String,
        #[source]
        source: PersistError,
    },
}

impl IntakeError {
    /// Whether resubmitting the same request can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, IntakeError::PersistenceWriteFailed { .. })
    }
}
