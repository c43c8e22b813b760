use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::summary::SummaryField;

/// One outstanding question, pending for a missing summary field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub field: SummaryField,
    pub question: String,
    /// Lower number = asked first
    pub priority: u8,
    #[serde(default)]
    pub asked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asked_at: Option<DateTime<Utc>>,
}

impl QuestionItem {
    pub fn for_field(field: SummaryField) -> Self {
        Self {
            field,
            question: field.question().to_string(),
            priority: field.priority(),
            asked: false,
            asked_at: None,
        }
    }

    pub fn mark_asked(&mut self, at: DateTime<Utc>) {
        self.asked = true;
        self.asked_at = Some(at);
    }
}
