use async_trait::async_trait;
use intake_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use intake_types::{LLMConfig, Summary, SummaryField};
use std::sync::Arc;
use std::time::Duration;

/// Turns the run's outcome into the assistant's reply
#[async_trait]
pub trait MessageComposer: Send + Sync {
    async fn compose(
        &self,
        summary: &Summary,
        questions: &[String],
        captured: &[SummaryField],
        missing: &[SummaryField],
    ) -> String;
}

/// Deterministic reply built from fixed sentences
#[derive(Debug, Clone, Default)]
pub struct TemplateComposer;

impl TemplateComposer {
    pub fn render(questions: &[String], captured: &[SummaryField], missing: &[SummaryField]) -> String {
        let mut parts = Vec::new();
        if !captured.is_empty() {
            parts.push(format!("Great, I captured {}.", join_labels(captured)));
        }

        if !questions.is_empty() {
            parts.extend(questions.iter().cloned());
        } else if !missing.is_empty() {
            parts.push(format!(
                "Whenever you're ready, tell me more about {}.",
                join_labels(missing)
            ));
        } else {
            parts.push(
                "The brief is complete for now. Feel free to keep refining it or ask for adjustments."
                    .to_string(),
            );
        }

        parts.join(" ")
    }
}

#[async_trait]
impl MessageComposer for TemplateComposer {
    async fn compose(
        &self,
        _summary: &Summary,
        questions: &[String],
        captured: &[SummaryField],
        missing: &[SummaryField],
    ) -> String {
        Self::render(questions, captured, missing)
    }
}

/// Friendly reply written by a chat model, falling back to the template
pub struct LlmComposer {
    client: Arc<dyn ChatClient>,
    config: LLMConfig,
    timeout: Duration,
}

impl LlmComposer {
    pub fn new(client: Arc<dyn ChatClient>, config: LLMConfig, timeout: Duration) -> Self {
        Self {
            client,
            config,
            timeout,
        }
    }

    async fn generate(&self, prompt: String) -> anyhow::Result<String> {
        let mut options = ChatOptions::new().max_tokens(256);
        if let Some(temperature) = self.config.temperature {
            options = options.temperature(temperature);
        }
        let request = ChatRequest::new(self.config.model.clone(), vec![Message::human(prompt)])
            .with_options(options);

        let response = tokio::time::timeout(self.timeout, self.client.chat(request))
            .await
            .map_err(|_| anyhow::anyhow!("reply generation timed out after {:?}", self.timeout))??;

        response
            .content
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow::anyhow!("empty reply"))
    }
}

#[async_trait]
impl MessageComposer for LlmComposer {
    async fn compose(
        &self,
        summary: &Summary,
        questions: &[String],
        captured: &[SummaryField],
        missing: &[SummaryField],
    ) -> String {
        match self.generate(build_prompt(summary, questions, captured)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Reply generation failed; using template");
                TemplateComposer::render(questions, captured, missing)
            }
        }
    }
}

fn build_prompt(summary: &Summary, questions: &[String], captured: &[SummaryField]) -> String {
    let captured = if captured.is_empty() {
        "nothing new".to_string()
    } else {
        join_labels(captured)
    };
    let outstanding = if questions.is_empty() {
        "- None".to_string()
    } else {
        questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are a warm, concise project intake assistant. Acknowledge what you just learned \
         and ask for what is still needed without sounding repetitive. End with a natural \
         question when more information is needed.\n\n\
         Just captured: {captured}.\n\
         Known facts:\n\
         - Title: {}\n\
         - Problem: {}\n\
         - Solution: {}\n\
         - Target users: {}\n\
         - Success metrics: {}\n\
         - Constraints: {}\n\
         - Timeline: {}\n\n\
         Questions to ask:\n{outstanding}",
        summary.project_title,
        summary.problem.as_deref().unwrap_or("pending"),
        summary.solution.as_deref().unwrap_or("pending"),
        or_pending(&summary.target_users),
        or_pending(&summary.success_metrics),
        or_pending(&summary.constraints),
        summary.timeline.as_deref().unwrap_or("pending"),
    )
}

fn or_pending(values: &[String]) -> String {
    if values.is_empty() {
        "pending".to_string()
    } else {
        values.join(", ")
    }
}

/// "a", "a and b", "a, b and c"
fn join_labels(fields: &[SummaryField]) -> String {
    let labels: Vec<&str> = fields.iter().map(|field| field.label()).collect();
    match labels.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_llm::ChatResponse;

    struct CannedClient(Option<String>);

    #[async_trait]
    impl ChatClient for CannedClient {
        async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
            Ok(ChatResponse {
                content: self.0.clone(),
                usage: None,
                finish_reason: Some("stop".into()),
                raw: serde_json::Value::Null,
            })
        }
    }

    struct DownClient;

    #[async_trait]
    impl ChatClient for DownClient {
        async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
            anyhow::bail!("503 Service Unavailable")
        }
    }

    fn composer(client: impl ChatClient + 'static) -> LlmComposer {
        LlmComposer::new(Arc::new(client), LLMConfig::default(), Duration::from_secs(1))
    }

    #[test]
    fn test_template_acknowledges_then_asks() {
        let message = TemplateComposer::render(
            &["How will you measure success?".to_string()],
            &[SummaryField::Problem, SummaryField::TargetUsers],
            &[SummaryField::SuccessMetrics],
        );
        assert_eq!(
            message,
            "Great, I captured the problem and the target users. How will you measure success?"
        );
    }

    #[test]
    fn test_template_reports_completion() {
        let message = TemplateComposer::render(&[], &[SummaryField::Resources], &[]);
        assert!(message.starts_with("Great, I captured resources."));
        assert!(message.contains("The brief is complete for now."));
    }

    #[test]
    fn test_template_invites_detail_when_everything_was_asked() {
        let message = TemplateComposer::render(
            &[],
            &[],
            &[SummaryField::ProjectTitle, SummaryField::Timeline, SummaryField::Resources],
        );
        assert_eq!(
            message,
            "Whenever you're ready, tell me more about the project title, the timeline and resources."
        );
    }

    #[tokio::test]
    async fn test_llm_reply_is_trimmed() {
        let reply = composer(CannedClient(Some("  Thanks! What's the timeline?\n".into())))
            .compose(&Summary::default(), &[], &[], &[])
            .await;
        assert_eq!(reply, "Thanks! What's the timeline?");
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_template() {
        let questions = vec!["What is the timeline or key milestones?".to_string()];
        let reply = composer(DownClient)
            .compose(&Summary::default(), &questions, &[], &[SummaryField::Timeline])
            .await;
        assert_eq!(reply, "What is the timeline or key milestones?");

        let reply = composer(CannedClient(Some("   ".into())))
            .compose(&Summary::default(), &questions, &[], &[SummaryField::Timeline])
            .await;
        assert_eq!(reply, "What is the timeline or key milestones?");
    }
}
