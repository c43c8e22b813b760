use async_trait::async_trait;
use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;

use crate::backend::{BackendKind, CheckpointBackend};
use crate::dbs::mongo::models::CheckpointDocument;
use crate::error::{PersistError, Result};

pub struct MongoCheckpointBackend {
    client: Client,
    collection: Collection<CheckpointDocument>,
}

impl MongoCheckpointBackend {
    /// Connect to MongoDB and verify the deployment answers a ping
    ///
    /// The driver connects lazily, so without the ping an unreachable server
    /// would only surface on the first read.
    pub async fn connect(
        mongodb_uri: &str,
        database: &str,
        collection: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        options.connect_timeout = Some(connect_timeout);
        options.server_selection_timeout = Some(connect_timeout);
        options.app_name = Some("project-brief-intake".to_string());

        let client = Client::with_options(options)
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        tracing::info!(database, collection, "Connected to MongoDB checkpoint store");

        Ok(Self {
            collection: db.collection(collection),
            client,
        })
    }
}

#[async_trait]
impl CheckpointBackend for MongoCheckpointBackend {
    async fn get(&self, thread_id: &str) -> Result<Option<Vec<u8>>> {
        let filter = doc! { "_id": thread_id };
        let checkpoint = self.collection.find_one(filter).await?;
        Ok(checkpoint.map(CheckpointDocument::into_bytes))
    }

    async fn put(&self, thread_id: &str, bytes: Vec<u8>) -> Result<()> {
        let filter = doc! { "_id": thread_id };
        let checkpoint = CheckpointDocument::new(thread_id, bytes);
        self.collection
            .replace_one(filter, &checkpoint)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Mongo
    }
}
