use bson::spec::BinarySubtype;
use bson::Binary;
use serde::{Deserialize, Serialize};

/// One checkpoint per thread; `_id` is the thread id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDocument {
    #[serde(rename = "_id")]
    pub thread_id: String,
    pub state: Binary,
    pub updated_at: bson::DateTime,
}

impl CheckpointDocument {
    pub fn new(thread_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            thread_id: thread_id.into(),
            state: Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            },
            updated_at: bson::DateTime::now(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.state.bytes
    }
}
