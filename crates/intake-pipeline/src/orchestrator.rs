use chrono::Utc;
use intake_persist::ThreadStateStore;
use intake_types::{IntakeOutput, IntakeRequest, PipelineConfig, SummaryField, ThreadState};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::composer::MessageComposer;
use crate::context::extraction_input;
use crate::error::IntakeError;
use crate::extractor::FactExtractor;
use crate::formatter::BriefFormatter;
use crate::locks::ThreadLocks;
use crate::scheduler::QuestionScheduler;

/// Steps of a single run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    Loading,
    Merging,
    Extracting,
    Scheduling,
    Formatting,
    Persisting,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Loading => "loading",
            RunPhase::Merging => "merging",
            RunPhase::Extracting => "extracting",
            RunPhase::Scheduling => "scheduling",
            RunPhase::Formatting => "formatting",
            RunPhase::Persisting => "persisting",
            RunPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Drives the fixed extract → format pipeline over checkpointed thread state
pub struct IntakeOrchestrator {
    store: Arc<ThreadStateStore>,
    extractor: FactExtractor,
    composer: Arc<dyn MessageComposer>,
    config: PipelineConfig,
    locks: ThreadLocks,
}

impl IntakeOrchestrator {
    pub fn new(
        store: Arc<ThreadStateStore>,
        extractor: FactExtractor,
        composer: Arc<dyn MessageComposer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            composer,
            config,
            locks: ThreadLocks::new(),
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::IntakeOrchestratorBuilder {
        crate::builder::IntakeOrchestratorBuilder::new()
    }

    pub fn store(&self) -> &Arc<ThreadStateStore> {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Merge the request into the thread's state and produce the next response.
    ///
    /// Runs on the same thread id are serialized; only validation and
    /// persistence failures are returned.
    pub async fn run(&self, request: IntakeRequest) -> Result<IntakeOutput, IntakeError> {
        validate(&request)?;
        let start = Instant::now();

        let requested_id = request
            .thread_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let thread_id = requested_id
            .map(str::to_string)
            .unwrap_or_else(ThreadState::generate_id);

        let _guard = self.locks.acquire(&thread_id).await;

        tracing::debug!(thread_id = %thread_id, phase = %RunPhase::Loading, "Intake run started");
        let prior = match requested_id {
            Some(id) => self.load(id).await,
            None => None,
        };
        if request.conversation.is_empty() && prior.is_none() {
            return Err(IntakeError::Validation(format!(
                "conversation is empty and thread {thread_id} has no prior state"
            )));
        }
        let previous_summary = prior.as_ref().map(|state| state.summary.clone());
        let mut state = prior.unwrap_or_else(|| ThreadState::new(thread_id.clone()));

        tracing::debug!(thread_id = %thread_id, phase = %RunPhase::Merging, "Merging input");
        let new_turns = state.merge_conversation(&request.conversation);
        let new_documents = state.merge_documents(&request.documents);
        if new_turns == 0 && new_documents == 0 {
            tracing::info!(
                thread_id = %thread_id,
                "No new turns or documents; replaying stored response"
            );
            return Ok(replay(&state));
        }

        tracing::debug!(thread_id = %thread_id, phase = %RunPhase::Extracting, "Extracting summary");
        let raw_text = extraction_input(&state.conversation, &self.config.context_policy);
        let extraction = self
            .extractor
            .extract(&raw_text, &state.document_names())
            .await;
        let degraded = extraction.is_degraded();
        let summary = extraction.into_summary();

        tracing::debug!(thread_id = %thread_id, phase = %RunPhase::Scheduling, "Scheduling questions");
        let mut queue =
            QuestionScheduler::update(previous_summary.as_ref(), &summary, &state.question_queue);
        let selected = QuestionScheduler::select_next(&queue, self.config.max_questions);
        let selected_fields: Vec<SummaryField> = selected.iter().map(|item| item.field).collect();
        QuestionScheduler::mark_asked(&mut queue, &selected_fields, Utc::now());

        let follow_up_questions: Vec<String> =
            selected.into_iter().map(|item| item.question).collect();
        let captured = QuestionScheduler::newly_captured(previous_summary.as_ref(), &summary);
        let assistant_message = self
            .composer
            .compose(&summary, &follow_up_questions, &captured, &summary.missing_fields())
            .await;

        tracing::debug!(thread_id = %thread_id, phase = %RunPhase::Formatting, "Formatting brief");
        let brief = BriefFormatter::format(&summary);

        tracing::debug!(thread_id = %thread_id, phase = %RunPhase::Persisting, "Persisting state");
        state.summary = summary;
        state.question_queue = queue;
        state.last_assistant_message = assistant_message;
        state.last_follow_up_questions = follow_up_questions;
        state.touch();

        if let Err(source) = self.store.save(&state).await {
            tracing::error!(
                thread_id = %thread_id,
                error = %source,
                "Failed to persist thread state; discarding run result"
            );
            return Err(IntakeError::PersistenceWriteFailed { thread_id, source });
        }

        tracing::info!(
            thread_id = %thread_id,
            phase = %RunPhase::Done,
            new_turns,
            new_documents,
            degraded,
            outstanding_questions = state.question_queue.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Intake run completed"
        );

        Ok(IntakeOutput {
            summary: state.summary,
            brief,
            follow_up_questions: state.last_follow_up_questions,
            assistant_message: state.last_assistant_message,
            thread_id: state.thread_id,
        })
    }

    /// Load failures degrade to a fresh thread
    async fn load(&self, thread_id: &str) -> Option<ThreadState> {
        match self.store.load(thread_id).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    thread_id = %thread_id,
                    error = %e,
                    "Failed to load thread state; starting fresh"
                );
                None
            }
        }
    }
}

fn validate(request: &IntakeRequest) -> Result<(), IntakeError> {
    if let Some(idx) = request
        .conversation
        .iter()
        .position(|turn| turn.content.trim().is_empty())
    {
        return Err(IntakeError::Validation(format!(
            "conversation turn {idx} has no content"
        )));
    }
    if let Some(idx) = request.documents.iter().position(|doc| doc.id.trim().is_empty()) {
        return Err(IntakeError::Validation(format!("document {idx} has an empty id")));
    }
    Ok(())
}

fn replay(state: &ThreadState) -> IntakeOutput {
    IntakeOutput {
        summary: state.summary.clone(),
        brief: BriefFormatter::format(&state.summary),
        follow_up_questions: state.last_follow_up_questions.clone(),
        assistant_message: state.last_assistant_message.clone(),
        thread_id: state.thread_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::{ConversationTurn, DocumentRef};

    #[test]
    fn test_validation_rejects_blank_turns_and_empty_ids() {
        let blank = IntakeRequest::new(vec![ConversationTurn::user("ok"), ConversationTurn::user(" ")]);
        assert!(matches!(validate(&blank), Err(IntakeError::Validation(msg)) if msg.contains("turn 1")));

        let bad_doc = IntakeRequest::new(vec![ConversationTurn::user("ok")])
            .with_documents(vec![DocumentRef::new("", "Unnamed")]);
        assert!(matches!(validate(&bad_doc), Err(IntakeError::Validation(_))));

        assert!(validate(&IntakeRequest::default()).is_ok());
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(RunPhase::Loading.to_string(), "loading");
        assert_eq!(RunPhase::Persisting.to_string(), "persisting");
    }
}
