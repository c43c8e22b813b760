use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::backend::{BackendKind, CheckpointBackend};
use crate::error::Result;

/// Process-local checkpoint storage; contents die with the process
#[derive(Default)]
pub struct InMemoryBackend {
    checkpoints: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.checkpoints.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.checkpoints.read().await.is_empty()
    }
}

#[async_trait]
impl CheckpointBackend for InMemoryBackend {
    async fn get(&self, thread_id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.checkpoints.read().await.get(thread_id).cloned())
    }

    async fn put(&self, thread_id: &str, bytes: Vec<u8>) -> Result<()> {
        self.checkpoints
            .write()
            .await
            .insert(thread_id.to_string(), bytes);
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::InMemory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_thread_is_none() {
        let backend = InMemoryBackend::new();
        assert!(backend.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_is_last_writer_wins() {
        let backend = InMemoryBackend::new();
        backend.put("t1", b"first".to_vec()).await.unwrap();
        backend.put("t1", b"second".to_vec()).await.unwrap();

        assert_eq!(backend.get("t1").await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(backend.len().await, 1);
    }
}
