use serde::{Deserialize, Serialize};

use crate::brief::Brief;
use crate::conversation::{ConversationTurn, DocumentRef};
use crate::summary::Summary;

/// Input of a single intake run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

impl IntakeRequest {
    pub fn new(conversation: Vec<ConversationTurn>) -> Self {
        Self {
            thread_id: None,
            conversation,
            documents: Vec::new(),
        }
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_documents(mut self, documents: Vec<DocumentRef>) -> Self {
        self.documents = documents;
        self
    }
}

/// Result of a single intake run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeOutput {
    pub summary: Summary,
    pub brief: Brief,
    pub follow_up_questions: Vec<String>,
    pub assistant_message: String,
    pub thread_id: String,
}
