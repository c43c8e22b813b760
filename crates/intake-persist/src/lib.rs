pub mod backend;
pub mod builder;
pub mod dbs;
pub mod error;
pub mod store;

pub use backend::{BackendKind, CheckpointBackend};
pub use builder::ThreadStateStoreBuilder;
pub use dbs::memory::InMemoryBackend;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoCheckpointBackend;
pub use error::PersistError;
pub use store::ThreadStateStore;
