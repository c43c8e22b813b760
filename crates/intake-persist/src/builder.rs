use std::time::Duration;

use crate::store::ThreadStateStore;

pub struct ThreadStateStoreBuilder {
    mongodb_uri: Option<String>,
    database: String,
    collection: String,
    connect_timeout: Duration,
    operation_timeout: Duration,
}

impl ThreadStateStoreBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: "project_brief".to_string(),
            collection: "agent_state".to_string(),
            connect_timeout: Duration::from_secs(3),
            operation_timeout: Duration::from_secs(5),
        }
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        self.mongodb_uri = if uri.trim().is_empty() { None } else { Some(uri) };
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Open the store. Never fails: an unreachable durable backend degrades
    /// to the in-memory backend for the rest of the process.
    pub async fn build(self) -> ThreadStateStore {
        let operation_timeout = self.operation_timeout;

        let store = match self.mongodb_uri.as_deref() {
            None => {
                tracing::info!("No MongoDB URI configured; using in-memory checkpoint store");
                ThreadStateStore::in_memory()
            }
            Some(uri) => ThreadStateStore::with_fallback(self.connect_durable(uri).await),
        };

        store.with_operation_timeout(operation_timeout)
    }

    #[cfg(feature = "mongodb")]
    async fn connect_durable(
        &self,
        uri: &str,
    ) -> crate::error::Result<std::sync::Arc<dyn crate::backend::CheckpointBackend>> {
        let backend = crate::dbs::mongo::MongoCheckpointBackend::connect(
            uri,
            &self.database,
            &self.collection,
            self.connect_timeout,
        )
        .await?;
        Ok(std::sync::Arc::new(backend))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn connect_durable(
        &self,
        _uri: &str,
    ) -> crate::error::Result<std::sync::Arc<dyn crate::backend::CheckpointBackend>> {
        Err(crate::error::PersistError::Internal(
            "built without the `mongodb` feature".to_string(),
        ))
    }
}

impl Default for ThreadStateStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
