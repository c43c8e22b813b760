use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::conversation::{ConversationTurn, DocumentRef, Role};
use crate::question::QuestionItem;
use crate::summary::Summary;

/// Everything accumulated for one intake thread between calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadState {
    pub thread_id: String,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub question_queue: Vec<QuestionItem>,
    #[serde(default)]
    pub last_assistant_message: String,
    #[serde(default)]
    pub last_follow_up_questions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ThreadState {
    pub fn new(thread_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            thread_id: thread_id.into(),
            conversation: Vec::new(),
            documents: Vec::new(),
            summary: Summary::default(),
            question_queue: Vec::new(),
            last_assistant_message: String::new(),
            last_follow_up_questions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Generate a fresh opaque thread id
    pub fn generate_id() -> String {
        format!("thread-{}", uuid::Uuid::new_v4())
    }

    /// Append the incoming turns not already present by (role, content).
    ///
    /// Incoming order is preserved. Returns how many turns were appended.
    pub fn merge_conversation(&mut self, incoming: &[ConversationTurn]) -> usize {
        let mut seen: HashSet<(Role, &str)> = self
            .conversation
            .iter()
            .map(ConversationTurn::signature)
            .collect();

        let fresh: Vec<ConversationTurn> = incoming
            .iter()
            .filter(|turn| seen.insert(turn.signature()))
            .cloned()
            .collect();

        let added = fresh.len();
        self.conversation.extend(fresh);
        added
    }

    /// Append the incoming documents whose id is not already present.
    ///
    /// Returns how many documents were appended.
    pub fn merge_documents(&mut self, incoming: &[DocumentRef]) -> usize {
        let mut seen: HashSet<String> = self.documents.iter().map(|d| d.id.clone()).collect();

        let before = self.documents.len();
        for doc in incoming {
            if seen.insert(doc.id.clone()) {
                self.documents.push(doc.clone());
            }
        }
        self.documents.len() - before
    }

    pub fn document_names(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|doc| doc.display_name().to_string())
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
