use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A single immutable turn of the intake conversation.
///
/// Two turns are the same turn when role and content match, regardless of
/// where they appear in a resubmitted history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Identity used for deduplication
    pub fn signature(&self) -> (Role, &str) {
        (self.role, self.content.as_str())
    }
}

/// Metadata for a document attached to the thread. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            notes: None,
            text: None,
        }
    }

    /// Name shown to the extractor; falls back to the id for unnamed uploads
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            self.name.trim()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_user() {
        let turn: ConversationTurn = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(turn.role, Role::User);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ConversationTurn::assistant("ok")).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<ConversationTurn, _> =
            serde_json::from_str(r#"{"role":"tool","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_signature_is_role_and_content() {
        let turn = ConversationTurn::user("We need a CRM");
        assert_eq!(turn.signature(), (Role::User, "We need a CRM"));
        assert_ne!(
            turn.signature(),
            ConversationTurn::assistant("We need a CRM").signature()
        );
    }

    #[test]
    fn test_document_display_name_falls_back_to_id() {
        assert_eq!(DocumentRef::new("doc-1", "  ").display_name(), "doc-1");
        assert_eq!(DocumentRef::new("doc-1", "Notes").display_name(), "Notes");
    }
}
