mod client;
mod models;

pub use client::MongoCheckpointBackend;
pub use models::CheckpointDocument;
