use intake_types::{ContextPolicy, ConversationTurn, Role};

/// Build the extractor's input from the merged conversation.
///
/// Only user turns are kept; `LastK` keeps the most recent `k` of them.
pub fn extraction_input(conversation: &[ConversationTurn], policy: &ContextPolicy) -> String {
    let user_turns: Vec<&str> = conversation
        .iter()
        .filter(|turn| turn.role == Role::User)
        .map(|turn| turn.content.trim())
        .filter(|content| !content.is_empty())
        .collect();

    let window = match policy {
        ContextPolicy::LastK { k } => &user_turns[user_turns.len().saturating_sub(*k)..],
        ContextPolicy::AllMessages => &user_turns[..],
    };

    window.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_user_turns_feed_extraction() {
        let conversation = vec![
            ConversationTurn::system("You are an intake agent."),
            ConversationTurn::user("We need a volunteer CRM."),
            ConversationTurn::assistant("Who are the users?"),
            ConversationTurn::user("Coordinators at food banks."),
        ];

        let input = extraction_input(&conversation, &ContextPolicy::AllMessages);
        assert_eq!(input, "We need a volunteer CRM.\nCoordinators at food banks.");
    }

    #[test]
    fn test_last_k_keeps_most_recent_user_turns() {
        let conversation: Vec<ConversationTurn> = (1..=5)
            .map(|i| ConversationTurn::user(format!("turn {i}")))
            .collect();

        let input = extraction_input(&conversation, &ContextPolicy::LastK { k: 2 });
        assert_eq!(input, "turn 4\nturn 5");

        let input = extraction_input(&conversation, &ContextPolicy::LastK { k: 50 });
        assert_eq!(input.lines().count(), 5);
    }

    #[test]
    fn test_blank_turns_are_skipped() {
        let conversation = vec![ConversationTurn::user("  "), ConversationTurn::user("Real content")];
        assert_eq!(
            extraction_input(&conversation, &ContextPolicy::default()),
            "Real content"
        );
    }
}
